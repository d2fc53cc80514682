//! Provider Registry
//!
//! Read-only table mapping a provider id to its wire configuration: the
//! credential environment variable, default endpoint, model catalog, and
//! the auth/wire strategies the adapter engine applies. Built once at
//! startup and passed explicitly to whatever needs it.
//!
//! Adding a provider means adding one row here, and one `WireShape`
//! variant only if its protocol is genuinely novel.

use crate::ai::provider::adapter::{AdapterConfig, ChatAdapter};
use crate::ai::provider::wire::{AuthScheme, WireShape};
use crate::types::{RepoWikiError, Result};

/// One supported provider. Constructed once, read-only thereafter.
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Environment variable consulted when no explicit key is supplied.
    pub credential_env: &'static str,
    pub default_base_url: &'static str,
    /// Known models; the first entry is the default.
    pub models: &'static [&'static str],
    pub auth: AuthScheme,
    pub wire: WireShape,
    /// Provider-mandated body parameters, applied to every request.
    pub fixed_extras: &'static [(&'static str, u64)],
}

impl ProviderSpec {
    pub fn default_model(&self) -> &'static str {
        self.models[0]
    }

    pub fn knows_model(&self, model: &str) -> bool {
        self.models.contains(&model)
    }
}

/// The built-in provider table.
static BUILTIN: &[ProviderSpec] = &[
    ProviderSpec {
        id: "deepseek",
        display_name: "DeepSeek",
        credential_env: "DEEPSEEK_API_KEY",
        default_base_url: "https://api.deepseek.com/v1",
        models: &[
            "deepseek-chat",
            "deepseek-coder",
            "deepseek-chat-v1.5",
            "deepseek-coder-v1.5",
        ],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    },
    ProviderSpec {
        id: "zhipuai",
        display_name: "ZhipuAI GLM",
        credential_env: "ZHIPUAI_API_KEY",
        default_base_url: "https://open.bigmodel.cn/api/paas/v4",
        models: &[
            "glm-4.6",
            "glm-4",
            "glm-4-flash",
            "glm-4-air",
            "glm-4-long",
            "chatglm3",
            "glm-3-turbo",
        ],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    },
    ProviderSpec {
        id: "moonshot",
        display_name: "Moonshot Kimi",
        credential_env: "MOONSHOT_API_KEY",
        default_base_url: "https://api.moonshot.cn/v1",
        models: &["moonshot-v1-8k", "moonshot-v1-32k", "moonshot-v1-128k"],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    },
    ProviderSpec {
        id: "wenxin",
        display_name: "Baidu ERNIE",
        credential_env: "WENXIN_API_KEY",
        default_base_url: "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/wenxinworkshop",
        models: &["ernie-bot", "ernie-bot-turbo", "ernie-bot-4"],
        auth: AuthScheme::Token,
        wire: WireShape::ErnieBot,
        fixed_extras: &[],
    },
    ProviderSpec {
        id: "lingyi",
        display_name: "Lingyi Wanwu Yi",
        credential_env: "LINGYI_API_KEY",
        default_base_url: "https://api.lingyiwanwu.com/v1",
        models: &["yi-large", "yi-medium", "yi-small", "yi-vision"],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    },
    ProviderSpec {
        id: "minimax",
        display_name: "MiniMax",
        credential_env: "MINIMAX_API_KEY",
        default_base_url: "https://api.minimax.chat/v1",
        models: &["abab6.5", "abab6.5-chat", "abab5.5-chat"],
        auth: AuthScheme::BearerWithSource,
        wire: WireShape::OpenAi,
        fixed_extras: &[("beam_width", 1)],
    },
    ProviderSpec {
        id: "doubao",
        display_name: "ByteDance Doubao",
        credential_env: "DOUBAO_API_KEY",
        default_base_url: "https://ark.cn-beijing.volces.com/api/v3",
        models: &[
            "doubao-lite-4k",
            "doubao-lite-32k",
            "doubao-lite-128k",
            "doubao-pro-4k",
            "doubao-pro-32k",
        ],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    },
    ProviderSpec {
        id: "stepfun",
        display_name: "StepFun",
        credential_env: "STEPFUN_API_KEY",
        default_base_url: "https://api.stepfun.com/v1",
        models: &["step-1-8k", "step-1-32k", "step-1-128k", "step-1-256k"],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    },
    ProviderSpec {
        id: "xunfei",
        display_name: "iFlytek Spark",
        credential_env: "XUNFEI_API_KEY",
        default_base_url: "https://spark-api.xf-yun.com/v1",
        models: &["spark-lite", "spark-pro", "spark-max"],
        auth: AuthScheme::Bearer,
        wire: WireShape::OpenAi,
        fixed_extras: &[],
    },
];

/// Immutable provider table with adapter construction.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    specs: &'static [ProviderSpec],
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProviderRegistry {
    /// Registry over the built-in provider table.
    pub fn builtin() -> Self {
        Self { specs: BUILTIN }
    }

    /// Resolve a provider id (case-insensitive, matching the original ids).
    pub fn get(&self, id: &str) -> Result<&'static ProviderSpec> {
        self.specs
            .iter()
            .find(|spec| spec.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| {
                RepoWikiError::Config(format!(
                    "Unknown provider: {}. Supported: {}",
                    id,
                    self.ids().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    /// Construct a ready adapter for a provider id.
    ///
    /// Credential resolution is fail-fast: an explicit key in `config`
    /// beats the provider's environment variable, and with neither present
    /// this returns a config error instead of deferring to the first call.
    pub fn adapter(&self, id: &str, config: AdapterConfig) -> Result<ChatAdapter> {
        let spec = self.get(id)?;
        ChatAdapter::new(spec, config)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.specs.iter().map(|spec| spec.id)
    }

    pub fn specs(&self) -> &'static [ProviderSpec] {
        self.specs
    }
}
