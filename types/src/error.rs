use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("address must be 32-44 characters, got {0}")]
    Length(usize),

    #[error("address contains non-base58 character '{0}'")]
    Character(char),
}
