use thiserror::Error;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Db(#[from] palaver_db::DbError),

    #[error("malformed {entity} record: {source}")]
    Decode {
        entity: &'static str,
        source: bson::de::Error,
    },

    #[error("could not encode {entity} record: {source}")]
    Encode {
        entity: &'static str,
        source: bson::ser::Error,
    },
}

pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    entity: &'static str,
    doc: bson::Document,
) -> ChatResult<T> {
    bson::from_document(doc).map_err(|source| ChatError::Decode { entity, source })
}

pub(crate) fn encode<T: serde::Serialize>(
    entity: &'static str,
    value: &T,
) -> ChatResult<bson::Document> {
    bson::to_document(value).map_err(|source| ChatError::Encode { entity, source })
}
