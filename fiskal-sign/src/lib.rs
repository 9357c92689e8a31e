//! Fiskal signing crate
//!
//! 负责财政链条目的数字签名：
//! - [`SigningMethod`]: 租户签名配置的 tagged union
//! - [`Signer`]: 签名能力抽象（本地私钥 / 远程签名服务）
//! - [`crypto`]: 底层签名/验签/证书解析 (ring + x509-parser)

mod crypto;
mod error;
mod method;
pub mod signer;

pub use crypto::{cert_serial, sign, verify};
pub use error::{Result, SignError};
pub use method::{RemoteProviderKind, SigningMethod};
pub use signer::{LocalKeySigner, RemoteSigner, Signer, signer_for};
