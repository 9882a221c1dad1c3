use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_locations_table::Migration),
            Box::new(m20240101_000002_create_users_table::Migration),
            Box::new(m20240101_000003_create_vehicle_groups_table::Migration),
            Box::new(m20240101_000004_create_vehicles_table::Migration),
            Box::new(m20240101_000005_create_rates_tables::Migration),
            Box::new(m20240101_000006_create_one_way_fees_table::Migration),
            Box::new(m20240101_000007_create_bookings_table::Migration),
            Box::new(m20240101_000008_create_payments_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_locations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(ColumnDef::new(Locations::AddressLine1).string().not_null())
                        .col(ColumnDef::new(Locations::AddressLine2).string().null())
                        .col(ColumnDef::new(Locations::City).string().not_null())
                        .col(ColumnDef::new(Locations::State).string().null())
                        .col(ColumnDef::new(Locations::PostalCode).string().null())
                        .col(ColumnDef::new(Locations::CountryCode).string().not_null())
                        .col(ColumnDef::new(Locations::Latitude).double().null())
                        .col(ColumnDef::new(Locations::Longitude).double().null())
                        .col(
                            ColumnDef::new(Locations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Locations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // City is the join key for fee lookups
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_locations_city")
                        .table(Locations::Table)
                        .col(Locations::City)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Locations {
        Table,
        Id,
        Name,
        AddressLine1,
        AddressLine2,
        City,
        State,
        PostalCode,
        CountryCode,
        Latitude,
        Longitude,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::FirstName).string().not_null())
                        .col(ColumnDef::new(Users::LastName).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().null().unique_key())
                        .col(ColumnDef::new(Users::Phone).string().null())
                        .col(
                            ColumnDef::new(Users::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::IsGuest)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Users::LicenceNumber).string().null())
                        .col(ColumnDef::new(Users::LicenceCountry).string().null())
                        .col(ColumnDef::new(Users::LicenceExpiry).date().null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_phone")
                        .table(Users::Table)
                        .col(Users::Phone)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        Phone,
        IsActive,
        IsGuest,
        LicenceNumber,
        LicenceCountry,
        LicenceExpiry,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_vehicle_groups_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_vehicle_groups_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(VehicleGroups::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VehicleGroups::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(VehicleGroups::Description).string().null())
                        .col(ColumnDef::new(VehicleGroups::Category).string().null())
                        .col(ColumnDef::new(VehicleGroups::Seats).integer().null())
                        .col(ColumnDef::new(VehicleGroups::Doors).integer().null())
                        .col(ColumnDef::new(VehicleGroups::Transmission).string().null())
                        .col(ColumnDef::new(VehicleGroups::FuelType).string().null())
                        .col(
                            ColumnDef::new(VehicleGroups::BasePricePerDay)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::BasePricePerWeek)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::BasePricePerMonth)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::DisplayOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::MinRentalDays)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::MaxRentalDays)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(VehicleGroups::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(VehicleGroups::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum VehicleGroups {
        Table,
        Id,
        Name,
        Description,
        Category,
        Seats,
        Doors,
        Transmission,
        FuelType,
        BasePricePerDay,
        BasePricePerWeek,
        BasePricePerMonth,
        DisplayOrder,
        IsActive,
        MinRentalDays,
        MaxRentalDays,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_vehicles_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_vehicles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vehicles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Vehicles::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Vehicles::LocationId).big_integer().null())
                        .col(
                            ColumnDef::new(Vehicles::VehicleGroupId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(Vehicles::Vin).string().null().unique_key())
                        .col(
                            ColumnDef::new(Vehicles::LicensePlate)
                                .string()
                                .null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Vehicles::Make).string().not_null())
                        .col(ColumnDef::new(Vehicles::Model).string().not_null())
                        .col(ColumnDef::new(Vehicles::Year).integer().null())
                        .col(ColumnDef::new(Vehicles::Color).string().null())
                        .col(ColumnDef::new(Vehicles::Transmission).string().null())
                        .col(ColumnDef::new(Vehicles::FuelType).string().null())
                        .col(ColumnDef::new(Vehicles::Seats).integer().null())
                        .col(ColumnDef::new(Vehicles::Doors).integer().null())
                        .col(ColumnDef::new(Vehicles::Mileage).integer().null())
                        .col(ColumnDef::new(Vehicles::Status).string().null())
                        .col(
                            ColumnDef::new(Vehicles::StartingPrice)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Vehicles::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Vehicles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vehicles::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vehicles_vehicle_group_id")
                        .table(Vehicles::Table)
                        .col(Vehicles::VehicleGroupId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_vehicles_location_id")
                        .table(Vehicles::Table)
                        .col(Vehicles::LocationId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vehicles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Vehicles {
        Table,
        Id,
        LocationId,
        VehicleGroupId,
        Vin,
        LicensePlate,
        Make,
        Model,
        Year,
        Color,
        Transmission,
        FuelType,
        Seats,
        Doors,
        Mileage,
        Status,
        StartingPrice,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_rates_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_rates_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Rates::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Rates::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Rates::Name).string().not_null().unique_key())
                        .col(ColumnDef::new(Rates::Description).string().null())
                        .col(ColumnDef::new(Rates::ParentRateId).big_integer().null())
                        .col(ColumnDef::new(Rates::IncrementType).string().null())
                        .col(ColumnDef::new(Rates::IncrementValue).integer().null())
                        .col(ColumnDef::new(Rates::ValidFrom).date().not_null())
                        .col(ColumnDef::new(Rates::ValidUntil).date().not_null())
                        .col(
                            ColumnDef::new(Rates::MinDays)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(Rates::MaxDays).integer().null())
                        .col(
                            ColumnDef::new(Rates::UnlimitedKm)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Rates::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Rates::PriceModifierName).string().null())
                        .col(ColumnDef::new(Rates::PriceModifierType).string().null())
                        .col(
                            ColumnDef::new(Rates::PriceModifierValue)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Rates::PriceModifierAppliesToAgreementOnly)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Rates::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Rates::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // The resolver filters on these three columns
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rates_active_valid_from")
                        .table(Rates::Table)
                        .col(Rates::IsActive)
                        .col(Rates::ValidFrom)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RateTiers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RateTiers::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateTiers::RateId).big_integer().not_null())
                        .col(
                            ColumnDef::new(RateTiers::VehicleGroupId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateTiers::FromDays)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(RateTiers::ToDays).integer().null())
                        .col(
                            ColumnDef::new(RateTiers::PricePerDay)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateTiers::Currency)
                                .string()
                                .not_null()
                                .default("EUR"),
                        )
                        .col(
                            ColumnDef::new(RateTiers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateTiers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rate_tiers_rate_group")
                        .table(RateTiers::Table)
                        .col(RateTiers::RateId)
                        .col(RateTiers::VehicleGroupId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RateDayRanges::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RateDayRanges::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateDayRanges::RateId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateDayRanges::Label).string().not_null())
                        .col(
                            ColumnDef::new(RateDayRanges::FromDays)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateDayRanges::ToDays).integer().null())
                        .col(
                            ColumnDef::new(RateDayRanges::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateDayRanges::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RateHourRanges::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RateHourRanges::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateHourRanges::RateId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateHourRanges::Label).string().not_null())
                        .col(
                            ColumnDef::new(RateHourRanges::FromHours)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateHourRanges::ToHours).integer().null())
                        .col(
                            ColumnDef::new(RateHourRanges::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateHourRanges::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RateKmRanges::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RateKmRanges::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateKmRanges::RateId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RateKmRanges::Label).string().not_null())
                        .col(ColumnDef::new(RateKmRanges::FromKm).integer().not_null())
                        .col(ColumnDef::new(RateKmRanges::ToKm).integer().null())
                        .col(
                            ColumnDef::new(RateKmRanges::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RateKmRanges::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RateKmRanges::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RateHourRanges::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RateDayRanges::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(RateTiers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Rates::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Rates {
        Table,
        Id,
        Name,
        Description,
        ParentRateId,
        IncrementType,
        IncrementValue,
        ValidFrom,
        ValidUntil,
        MinDays,
        MaxDays,
        UnlimitedKm,
        IsActive,
        PriceModifierName,
        PriceModifierType,
        PriceModifierValue,
        PriceModifierAppliesToAgreementOnly,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum RateTiers {
        Table,
        Id,
        RateId,
        VehicleGroupId,
        FromDays,
        ToDays,
        PricePerDay,
        Currency,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum RateDayRanges {
        Table,
        Id,
        RateId,
        Label,
        FromDays,
        ToDays,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum RateHourRanges {
        Table,
        Id,
        RateId,
        Label,
        FromHours,
        ToHours,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum RateKmRanges {
        Table,
        Id,
        RateId,
        Label,
        FromKm,
        ToKm,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_one_way_fees_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_one_way_fees_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OneWayFees::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OneWayFees::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OneWayFees::FromCity).string().not_null())
                        .col(ColumnDef::new(OneWayFees::ToCity).string().not_null())
                        .col(
                            ColumnDef::new(OneWayFees::FeeAmount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OneWayFees::Currency)
                                .string()
                                .not_null()
                                .default("EUR"),
                        )
                        .col(
                            ColumnDef::new(OneWayFees::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(OneWayFees::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OneWayFees::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Directional pair is unique; the reverse direction is a separate row
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_one_way_fees_pair")
                        .table(OneWayFees::Table)
                        .col(OneWayFees::FromCity)
                        .col(OneWayFees::ToCity)
                        .unique()
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OneWayFees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OneWayFees {
        Table,
        Id,
        FromCity,
        ToCity,
        FeeAmount,
        Currency,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000007_create_bookings_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_bookings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Bookings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Bookings::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Bookings::UserId).big_integer().not_null())
                        .col(ColumnDef::new(Bookings::VehicleId).big_integer().null())
                        .col(
                            ColumnDef::new(Bookings::VehicleGroupId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Bookings::PickupLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Bookings::DropoffLocationId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(Bookings::PickupDatetime).date_time().null())
                        .col(
                            ColumnDef::new(Bookings::DropoffDatetime)
                                .date_time()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Bookings::Status)
                                .string_len(20)
                                .not_null()
                                .default("PENDING"),
                        )
                        .col(
                            ColumnDef::new(Bookings::PaymentStatus)
                                .string_len(20)
                                .not_null()
                                .default("UNPAID"),
                        )
                        .col(ColumnDef::new(Bookings::RateId).big_integer().null())
                        .col(ColumnDef::new(Bookings::RateTierId).big_integer().null())
                        .col(
                            ColumnDef::new(Bookings::PricePerDay)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Bookings::OneWayFee)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Bookings::DeliveryFee)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Bookings::TotalAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Bookings::Currency)
                                .string()
                                .not_null()
                                .default("EUR"),
                        )
                        .col(ColumnDef::new(Bookings::FirstName).string().not_null())
                        .col(ColumnDef::new(Bookings::LastName).string().not_null())
                        .col(ColumnDef::new(Bookings::Email).string().not_null())
                        .col(ColumnDef::new(Bookings::Phone).string().null())
                        .col(ColumnDef::new(Bookings::Broker).string().null())
                        .col(ColumnDef::new(Bookings::Notes).string().null())
                        .col(
                            ColumnDef::new(Bookings::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Bookings::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_user_id")
                        .table(Bookings::Table)
                        .col(Bookings::UserId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_vehicle_id")
                        .table(Bookings::Table)
                        .col(Bookings::VehicleId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bookings_status")
                        .table(Bookings::Table)
                        .col(Bookings::Status)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Bookings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Bookings {
        Table,
        Id,
        UserId,
        VehicleId,
        VehicleGroupId,
        PickupLocationId,
        DropoffLocationId,
        PickupDatetime,
        DropoffDatetime,
        Status,
        PaymentStatus,
        RateId,
        RateTierId,
        PricePerDay,
        OneWayFee,
        DeliveryFee,
        TotalAmount,
        Currency,
        FirstName,
        LastName,
        Email,
        Phone,
        Broker,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000008_create_payments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Payments::Id)
                                .big_integer()
                                .auto_increment()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::BookingId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Payments::UserId).big_integer().null())
                        .col(
                            ColumnDef::new(Payments::Amount)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::Currency)
                                .string()
                                .not_null()
                                .default("EUR"),
                        )
                        .col(ColumnDef::new(Payments::Method).string().null())
                        .col(
                            ColumnDef::new(Payments::Status)
                                .string_len(20)
                                .not_null()
                                .default("PENDING"),
                        )
                        .col(ColumnDef::new(Payments::Reference).string().null())
                        .col(
                            ColumnDef::new(Payments::PaidAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Payments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Payments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payments_booking_id")
                        .table(Payments::Table)
                        .col(Payments::BookingId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Payments {
        Table,
        Id,
        BookingId,
        UserId,
        Amount,
        Currency,
        Method,
        Status,
        Reference,
        PaidAt,
        CreatedAt,
        UpdatedAt,
    }
}
