//! Shared fixtures for unit tests.

use crate::domain::{Decimals, Token, TokenAddress};

/// A token whose address is twenty copies of `byte`.
#[allow(clippy::panic)]
pub(crate) fn token(byte: u8, decimals: u8) -> Token {
    let Ok(d) = Decimals::new(decimals) else {
        panic!("valid decimals");
    };
    Token::new(TokenAddress::from_bytes([byte; 20]), d)
}

/// The address of [`token`].
pub(crate) fn addr(byte: u8) -> TokenAddress {
    TokenAddress::from_bytes([byte; 20])
}
