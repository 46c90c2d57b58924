mod notifications_test;
