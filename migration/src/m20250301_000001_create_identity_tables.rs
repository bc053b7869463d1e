use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenants::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenants::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Tenants::Name).string().not_null())
                    .col(ColumnDef::new(Tenants::Kind).string().not_null())
                    .col(ColumnDef::new(Tenants::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Identities; tenant_id is assigned lazily on first provisioning
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().null())
                    .col(ColumnDef::new(Users::Role).string().not_null().default("USER"))
                    .col(ColumnDef::new(Users::TenantId).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_tenant_id")
                            .from(Users::Table, Users::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Regions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Regions::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Regions::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Regions::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // One studio per tenant: the unique key is what makes provisioning idempotent
        manager
            .create_table(
                Table::create()
                    .table(Studios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Studios::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Studios::Name).string().not_null())
                    .col(ColumnDef::new(Studios::ContactEmail).string().null())
                    .col(ColumnDef::new(Studios::ContactPhone).string().null())
                    .col(ColumnDef::new(Studios::TenantId).string().not_null().unique_key())
                    .col(ColumnDef::new(Studios::RegionId).string().null())
                    .col(ColumnDef::new(Studios::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_studios_tenant_id")
                            .from(Studios::Table, Studios::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_studios_region_id")
                            .from(Studios::Table, Studios::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::UserId).string().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::DisplayName).string().null())
                    .col(ColumnDef::new(Profiles::Bio).string().null())
                    .col(ColumnDef::new(Profiles::Availability).boolean().not_null().default(true))
                    .col(ColumnDef::new(Profiles::RegionId).string().null())
                    .col(ColumnDef::new(Profiles::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_user_id")
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_region_id")
                            .from(Profiles::Table, Profiles::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Locations::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Locations::Name).string().not_null())
                    .col(ColumnDef::new(Locations::RegionId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_region_id")
                            .from(Locations::Table, Locations::RegionId)
                            .to(Regions::Table, Regions::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfileSkills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProfileSkills::ProfileId).string().not_null())
                    .col(ColumnDef::new(ProfileSkills::Skill).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProfileSkills::ProfileId)
                            .col(ProfileSkills::Skill),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_skills_profile_id")
                            .from(ProfileSkills::Table, ProfileSkills::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProfileLocations::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProfileLocations::ProfileId).string().not_null())
                    .col(ColumnDef::new(ProfileLocations::LocationId).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProfileLocations::ProfileId)
                            .col(ProfileLocations::LocationId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_locations_profile_id")
                            .from(ProfileLocations::Table, ProfileLocations::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profile_locations_location_id")
                            .from(ProfileLocations::Table, ProfileLocations::LocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_tenant_id")
                    .table(Users::Table)
                    .col(Users::TenantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_locations_region_id")
                    .table(Locations::Table)
                    .col(Locations::RegionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProfileLocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProfileSkills::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Studios::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Regions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenants::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    TenantId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    Table,
    Id,
    Name,
    Kind,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Regions {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Studios {
    Table,
    Id,
    Name,
    ContactEmail,
    ContactPhone,
    TenantId,
    RegionId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Profiles {
    Table,
    Id,
    UserId,
    DisplayName,
    Bio,
    Availability,
    RegionId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    Name,
    RegionId,
}

#[derive(DeriveIden)]
enum ProfileSkills {
    Table,
    ProfileId,
    Skill,
}

#[derive(DeriveIden)]
enum ProfileLocations {
    Table,
    ProfileId,
    LocationId,
}
