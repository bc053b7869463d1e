use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_identity_tables::{Profiles, Regions, Studios};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Projects::StudioId).string().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_studio_id")
                            .from(Projects::Table, Projects::StudioId)
                            .to(Studios::Table, Studios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CastingCalls::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CastingCalls::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(CastingCalls::StudioId).string().not_null())
                    .col(ColumnDef::new(CastingCalls::ProjectId).string().null())
                    .col(ColumnDef::new(CastingCalls::RegionId).string().null())
                    .col(ColumnDef::new(CastingCalls::Title).string().not_null())
                    .col(ColumnDef::new(CastingCalls::Status).string().not_null().default("OPEN"))
                    .col(ColumnDef::new(CastingCalls::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_casting_calls_studio_id")
                            .from(CastingCalls::Table, CastingCalls::StudioId)
                            .to(Studios::Table, Studios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_casting_calls_project_id")
                            .from(CastingCalls::Table, CastingCalls::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_casting_calls_region_id")
                            .from(CastingCalls::Table, CastingCalls::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Applications::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Applications::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Applications::CastingCallId).string().not_null())
                    .col(ColumnDef::new(Applications::ProfileId).string().not_null())
                    .col(ColumnDef::new(Applications::Status).string().not_null().default("SUBMITTED"))
                    .col(ColumnDef::new(Applications::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_casting_call_id")
                            .from(Applications::Table, Applications::CastingCallId)
                            .to(CastingCalls::Table, CastingCalls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_applications_profile_id")
                            .from(Applications::Table, Applications::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExternalActors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ExternalActors::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(ExternalActors::StudioId).string().not_null())
                    .col(ColumnDef::new(ExternalActors::Name).string().not_null())
                    .col(ColumnDef::new(ExternalActors::Email).string().null())
                    .col(ColumnDef::new(ExternalActors::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_external_actors_studio_id")
                            .from(ExternalActors::Table, ExternalActors::StudioId)
                            .to(Studios::Table, Studios::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_casting_calls_studio_id")
                    .table(CastingCalls::Table)
                    .col(CastingCalls::StudioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_casting_call_id")
                    .table(Applications::Table)
                    .col(Applications::CastingCallId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_applications_profile_id")
                    .table(Applications::Table)
                    .col(Applications::ProfileId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExternalActors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Applications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CastingCalls::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    StudioId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CastingCalls {
    Table,
    Id,
    StudioId,
    ProjectId,
    RegionId,
    Title,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Applications {
    Table,
    Id,
    CastingCallId,
    ProfileId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExternalActors {
    Table,
    Id,
    StudioId,
    Name,
    Email,
    CreatedAt,
}
