use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010005_create_absence_justifications"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("absence_justifications"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Alias::new("student_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("class_session_id")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("description")).string_len(500).not_null())
                    .col(ColumnDef::new(Alias::new("document_path")).string().null())
                    .col(
                        ColumnDef::new(Alias::new("justification_type"))
                            .enumeration(
                                Alias::new("justification_type"),
                                vec![Alias::new("absence"), Alias::new("late_arrival")],
                            )
                            .not_null()
                            .default("absence"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("justification_status"),
                                vec![
                                    Alias::new("pending"),
                                    Alias::new("approved"),
                                    Alias::new("rejected"),
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Alias::new("teacher_comment")).text().null())
                    .col(ColumnDef::new(Alias::new("submitted_at")).timestamp().not_null().default(Expr::cust("CURRENT_TIMESTAMP")))
                    .col(ColumnDef::new(Alias::new("reviewed_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("reviewed_by")).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_justification_student")
                            .from(Alias::new("absence_justifications"), Alias::new("student_id"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_justification_session")
                            .from(Alias::new("absence_justifications"), Alias::new("class_session_id"))
                            .to(Alias::new("class_sessions"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_justification_reviewer")
                            .from(Alias::new("absence_justifications"), Alias::new("reviewed_by"))
                            .to(Alias::new("users"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_justification_student_session")
                    .table(Alias::new("absence_justifications"))
                    .col(Alias::new("student_id"))
                    .col(Alias::new("class_session_id"))
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("absence_justifications"))
                    .to_owned(),
            )
            .await
    }
}
