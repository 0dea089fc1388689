// ==========================================
// 出货检验追踪系统 - 身份提供者
// ==========================================
// 职责: 令牌登录 / 匿名登录,只产出用于审计戳的用户标识
// ==========================================

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 身份错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("无效的登录令牌: {0}")]
    InvalidToken(String),

    #[error("身份服务不可用: {0}")]
    ProviderUnavailable(String),
}

/// 登录后的用户身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub uid: String,
    pub is_anonymous: bool,
}

// ==========================================
// AuthProvider Trait
// ==========================================
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 使用预发令牌登录
    async fn sign_in_with_token(&self, token: &str) -> Result<UserIdentity, AuthError>;

    /// 匿名登录
    async fn sign_in_anonymously(&self) -> Result<UserIdentity, AuthError>;
}

// ==========================================
// LocalAuthProvider - 本地身份提供者
// ==========================================
// 令牌主体即用户标识;匿名用户标识为 anon-<uuid>
#[derive(Debug, Clone, Default)]
pub struct LocalAuthProvider;

impl LocalAuthProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    async fn sign_in_with_token(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let subject = token.trim();
        if subject.is_empty() {
            return Err(AuthError::InvalidToken("令牌为空".to_string()));
        }
        if subject.chars().any(char::is_whitespace) {
            return Err(AuthError::InvalidToken("令牌不能包含空白字符".to_string()));
        }
        Ok(UserIdentity {
            uid: subject.to_string(),
            is_anonymous: false,
        })
    }

    async fn sign_in_anonymously(&self) -> Result<UserIdentity, AuthError> {
        Ok(UserIdentity {
            uid: format!("anon-{}", Uuid::new_v4()),
            is_anonymous: true,
        })
    }
}
