pub mod dataverse;

pub use dataverse::{
    DEFAULT_API_URL, FetchError, FetchOptions, FetchOutcome, MAX_ATTEMPTS, READ_TIMEOUT, Result,
    build_client, decode_payload, fetch_all, fetch_dataset_metadata, write_metadata_json,
};
