// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 密码哈希与会话令牌工具
//!
//! 密码使用带随机盐的 HMAC-SHA256 哈希，存储格式为 `盐(hex)$摘要(hex)`。
//! 会话令牌为 32 字节随机数的十六进制表示。

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 16;

/// 对明文密码做加盐哈希
///
/// # 参数
///
/// * `password` - 明文密码
/// * `secret` - 服务端哈希密钥
///
/// # 返回值
///
/// `盐(hex)$摘要(hex)` 格式的存储串
pub fn hash_password(password: &str, secret: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::rng().random();
    let digest = mac_digest(password, secret, &salt);
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

/// 校验明文密码与存储的哈希是否匹配
///
/// 格式损坏的存储串一律视为不匹配
pub fn verify_password(password: &str, secret: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(&salt);
    mac.update(password.as_bytes());
    // verify_slice 为常量时间比较
    mac.verify_slice(&expected).is_ok()
}

/// 生成不透明的会话令牌
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

fn mac_digest(password: &str, secret: &str, salt: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(salt);
    mac.update(password.as_bytes());
    mac.finalize().into_bytes().to_vec()
}
