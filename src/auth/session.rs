// ==========================================
// 出货检验追踪系统 - 会话
// ==========================================
// 登录失败不阻断: 记录日志后以无身份状态继续
// 无身份时同步网关跳过写入,新建采购单以 "guest" 署名
// ==========================================

use crate::auth::provider::{AuthProvider, UserIdentity};

/// 无身份时的署名
pub const GUEST_STAMP: &str = "guest";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<UserIdentity>,
}

impl Session {
    /// 建立会话
    ///
    /// # 参数
    /// - `provider`: 身份提供者
    /// - `token`: 预发令牌（None 时匿名登录）
    pub async fn start(provider: &dyn AuthProvider, token: Option<&str>) -> Self {
        let result = match token {
            Some(token) => provider.sign_in_with_token(token).await,
            None => provider.sign_in_anonymously().await,
        };

        match result {
            Ok(identity) => {
                tracing::info!(
                    uid = %identity.uid,
                    anonymous = identity.is_anonymous,
                    "登录成功"
                );
                Self {
                    identity: Some(identity),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "登录失败,以无身份状态继续");
                Self::anonymous_offline()
            }
        }
    }

    /// 无身份会话
    pub fn anonymous_offline() -> Self {
        Self { identity: None }
    }

    /// 以指定身份建立会话
    pub fn with_identity(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn uid(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.uid.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// 审计署名（无身份时为 guest）
    pub fn updated_by(&self) -> String {
        self.uid().unwrap_or(GUEST_STAMP).to_string()
    }
}
