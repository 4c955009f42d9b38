use sea_orm::{DatabaseTransaction, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

pub use entity::{oauth_state_references, Id};

pub mod error;
pub mod oauth_state_reference;

/// Parses a string into an entity `Id`, reporting malformed input as an invalid query term
/// so callers can reject it before touching the database.
pub fn uuid_parse_str(uuid_str: &str) -> Result<Id, error::Error> {
    Id::parse_str(uuid_str).map_err(|_| error::Error {
        source: None,
        error_kind: error::EntityApiErrorKind::InvalidQueryTerm,
    })
}

/// Runs `callback` inside a single database transaction.
///
/// The transaction is committed if and only if `callback` returns `Ok`. Any error, whether
/// raised by the callback or by beginning/committing the transaction itself, rolls back every
/// statement issued through the transaction handle.
///
/// # Example
///
/// ```ignore
/// let model = entity_api::transactional(db, |txn| {
///     Box::pin(async move { oauth_state_reference::create(txn, model).await })
/// })
/// .await?;
/// ```
pub async fn transactional<C, F, T>(db: &C, callback: F) -> Result<T, error::Error>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(
            &'c DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, error::Error>> + Send + 'c>>
        + Send,
    T: Send,
{
    db.transaction::<F, T, error::Error>(callback)
        .await
        .map_err(|err| match err {
            TransactionError::Connection(db_err) => error::Error::from(db_err),
            TransactionError::Transaction(err) => err,
        })
}
