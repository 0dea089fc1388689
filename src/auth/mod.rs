// ==========================================
// 出货检验追踪系统 - 身份层
// ==========================================
// 身份只用于审计署名 (updatedBy),不做权限控制
// ==========================================

pub mod provider;
pub mod session;

pub use provider::{AuthError, AuthProvider, LocalAuthProvider, UserIdentity};
pub use session::{Session, GUEST_STAMP};
