use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Signed-out sessions, keyed by HMAC of the token id
        manager
            .create_table(
                Table::create()
                    .table(SessionRevocations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionRevocations::JtiHash).string().not_null().primary_key())
                    .col(ColumnDef::new(SessionRevocations::UserId).string().not_null())
                    .col(ColumnDef::new(SessionRevocations::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(SessionRevocations::RevokedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_session_revocations_user_id")
                            .from(SessionRevocations::Table, SessionRevocations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_session_revocations_expires_at")
                    .table(SessionRevocations::Table)
                    .col(SessionRevocations::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionRevocations::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum SessionRevocations {
    Table,
    JtiHash,
    UserId,
    ExpiresAt,
    RevokedAt,
}
