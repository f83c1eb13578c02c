//! Endpoint paths and protocol constants

/// Conversation history endpoint (timestamp-cursor pagination).
pub const CONVERSATIONS_HISTORY: &str = "conversations.history";

/// Thread replies endpoint (oldest-cursor pagination).
pub const CONVERSATIONS_REPLIES: &str = "conversations.replies";

/// Channel search endpoint (page-number pagination).
pub const SEARCH_MODULES: &str = "search.modules";

/// Workspace boot/metadata endpoint (single call, no pagination).
pub const CLIENT_BOOT: &str = "client.boot";

/// Redirect target submitted with the sign-in form.
pub const SIGNIN_REDIR: &str = "/gantry/client";

/// Far-future `latest` sentinel used to start a history walk from the
/// newest message in a channel.
pub const LATEST_SENTINEL: &str = "9999999999.999999";

/// Default page size for history and reply requests.
pub const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Number of leading `version_hash` characters carried in `_x_id`.
pub const X_ID_HASH_PREFIX_LEN: usize = 8;
