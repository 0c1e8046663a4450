use ::distance::StoreError;

pub mod distance;
pub mod geocode;
pub mod location;
pub mod shipment;

pub(crate) fn convert_error(why: sqlx::Error) -> StoreError {
    match why {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(db.message().to_owned())
        }
        _ => StoreError::Other(Box::new(why)),
    }
}
