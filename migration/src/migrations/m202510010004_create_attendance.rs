use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010004_create_attendance"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // attendance_codes: at most one per session
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_codes"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(
                        ColumnDef::new(Alias::new("class_session_id"))
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("code"))
                            .string_len(6)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Alias::new("generated_by")).integer().null())
                    .col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("expires_at")).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_code_session")
                            .from(Alias::new("attendance_codes"), Alias::new("class_session_id"))
                            .to(Alias::new("class_sessions"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_code_user")
                            .from(Alias::new("attendance_codes"), Alias::new("generated_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // attendance_records
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("attendance_records"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("class_session_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("submitted_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(
                        ColumnDef::new(Alias::new("is_present"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Alias::new("simulated_ip")).string().null())
                    .col(ColumnDef::new(Alias::new("latitude")).double().null())
                    .col(ColumnDef::new(Alias::new("longitude")).double().null())
                    .col(ColumnDef::new(Alias::new("is_fraudulent")).boolean().null())
                    .col(ColumnDef::new(Alias::new("fraud_explanation")).text().null())
                    .col(ColumnDef::new(Alias::new("fraud_checked_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("validated_by")).integer().null())
                    .col(ColumnDef::new(Alias::new("validated_at")).timestamp().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_rec_session")
                            .from(Alias::new("attendance_records"), Alias::new("class_session_id"))
                            .to(Alias::new("class_sessions"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_rec_student")
                            .from(Alias::new("attendance_records"), Alias::new("student_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_att_rec_validator")
                            .from(Alias::new("attendance_records"), Alias::new("validated_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_att_rec_session_student")
                    .table(Alias::new("attendance_records"))
                    .col(Alias::new("class_session_id"))
                    .col(Alias::new("student_id"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("attendance_records")).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Alias::new("attendance_codes")).to_owned())
            .await
    }
}
