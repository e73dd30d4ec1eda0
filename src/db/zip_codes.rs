use sea_orm::*;

use crate::models::zip_codes;

/// Fetch a single ZIP reference row.
pub async fn get_zip(
    db: &DatabaseConnection,
    zip: &str,
) -> Result<Option<zip_codes::Model>, DbErr> {
    zip_codes::Entity::find_by_id(zip.to_owned()).one(db).await
}

/// Number of seeded ZIP rows (used by `load_zips` to skip re-seeding).
pub async fn count_zips(db: &DatabaseConnection) -> Result<u64, DbErr> {
    zip_codes::Entity::find().count(db).await
}

/// Bulk-insert ZIP reference rows (seeding only).
pub async fn insert_zips(
    db: &DatabaseConnection,
    rows: Vec<zip_codes::Model>,
) -> Result<(), DbErr> {
    // insert_many rejects an empty iterator; chunk to keep statements bounded.
    for chunk in rows.chunks(500) {
        let models = chunk.iter().cloned().map(|m| zip_codes::ActiveModel {
            zip: Set(m.zip),
            city: Set(m.city),
            state: Set(m.state),
            lat: Set(m.lat),
            lon: Set(m.lon),
        });
        zip_codes::Entity::insert_many(models).exec(db).await?;
    }
    Ok(())
}
