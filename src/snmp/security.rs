use std::fmt;

use snmp2::v3;

use crate::error::{Result, SnmpError};

/// Протоколы аутентификации USM, которые мы умеем
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthProtocol {
    Md5,
    Sha1,
    HmacSha224,
    HmacSha256,
    HmacSha384,
    HmacSha512,
}

/// Протоколы шифрования USM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivProtocol {
    Des,
    Aes128,
    Aes192,
    Aes256,
}

const AUTH_PROTOCOLS: &[(&str, AuthProtocol)] = &[
    ("md5", AuthProtocol::Md5),
    ("sha", AuthProtocol::Sha1),
    ("sha1", AuthProtocol::Sha1),
    ("hmac128sha224", AuthProtocol::HmacSha224),
    ("hmac192sha256", AuthProtocol::HmacSha256),
    ("hmac256sha384", AuthProtocol::HmacSha384),
    ("hmac384sha512", AuthProtocol::HmacSha512),
];

const PRIV_PROTOCOLS: &[(&str, PrivProtocol)] = &[
    ("des", PrivProtocol::Des),
    ("aes", PrivProtocol::Aes128),
    ("aes128", PrivProtocol::Aes128),
    ("aes192", PrivProtocol::Aes192),
    ("aes256", PrivProtocol::Aes256),
];

impl AuthProtocol {
    pub fn resolve(name: &str) -> Result<Self> {
        lookup(AUTH_PROTOCOLS, name).ok_or_else(|| {
            SnmpError::Configuration(format!("Неизвестный AuthProtocol: '{}'", name))
        })
    }
}

impl PrivProtocol {
    pub fn resolve(name: &str) -> Result<Self> {
        lookup(PRIV_PROTOCOLS, name).ok_or_else(|| {
            SnmpError::Configuration(format!("Неизвестный PrivProtocol: '{}'", name))
        })
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    let name = name.trim();
    table
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, protocol)| *protocol)
}

impl From<AuthProtocol> for v3::AuthProtocol {
    fn from(protocol: AuthProtocol) -> Self {
        match protocol {
            AuthProtocol::Md5 => v3::AuthProtocol::Md5,
            AuthProtocol::Sha1 => v3::AuthProtocol::Sha1,
            AuthProtocol::HmacSha224 => v3::AuthProtocol::Sha224,
            AuthProtocol::HmacSha256 => v3::AuthProtocol::Sha256,
            AuthProtocol::HmacSha384 => v3::AuthProtocol::Sha384,
            AuthProtocol::HmacSha512 => v3::AuthProtocol::Sha512,
        }
    }
}

impl From<PrivProtocol> for v3::Cipher {
    fn from(protocol: PrivProtocol) -> Self {
        match protocol {
            PrivProtocol::Des => v3::Cipher::Des,
            PrivProtocol::Aes128 => v3::Cipher::Aes128,
            PrivProtocol::Aes192 => v3::Cipher::Aes192,
            PrivProtocol::Aes256 => v3::Cipher::Aes256,
        }
    }
}

impl fmt::Display for AuthProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthProtocol::Md5 => "md5",
            AuthProtocol::Sha1 => "sha1",
            AuthProtocol::HmacSha224 => "hmac128sha224",
            AuthProtocol::HmacSha256 => "hmac192sha256",
            AuthProtocol::HmacSha384 => "hmac256sha384",
            AuthProtocol::HmacSha512 => "hmac384sha512",
        };
        f.write_str(name)
    }
}

impl fmt::Display for PrivProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrivProtocol::Des => "des",
            PrivProtocol::Aes128 => "aes128",
            PrivProtocol::Aes192 => "aes192",
            PrivProtocol::Aes256 => "aes256",
        };
        f.write_str(name)
    }
}
