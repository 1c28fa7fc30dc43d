use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_llm();
        self.apply_env_overrides_retrieval();
        self.apply_env_overrides_server();
    }

    fn apply_env_overrides_llm(&mut self) {
        if let Ok(v) = std::env::var("CINEMATCH_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("CINEMATCH_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("CINEMATCH_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("CINEMATCH_LLM_TEMPERATURE") {
            match v.parse::<f32>() {
                Ok(t) => self.llm.temperature = t,
                Err(_) => tracing::warn!("ignoring invalid CINEMATCH_LLM_TEMPERATURE value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("CINEMATCH_LLM_FREQUENCY_PENALTY") {
            match v.parse::<f32>() {
                Ok(p) => self.llm.frequency_penalty = p,
                Err(_) => {
                    tracing::warn!("ignoring invalid CINEMATCH_LLM_FREQUENCY_PENALTY value: {v}");
                }
            }
        }
    }

    fn apply_env_overrides_retrieval(&mut self) {
        if let Ok(v) = std::env::var("SUPABASE_URL") {
            self.retrieval.url = v;
        }
        if let Ok(v) = std::env::var("CINEMATCH_RETRIEVAL_FUNCTION") {
            self.retrieval.function = v;
        }
        if let Ok(v) = std::env::var("CINEMATCH_RETRIEVAL_MATCH_THRESHOLD") {
            match v.parse::<f32>() {
                Ok(t) => self.retrieval.match_threshold = t,
                Err(_) => {
                    tracing::warn!("ignoring invalid CINEMATCH_RETRIEVAL_MATCH_THRESHOLD value: {v}");
                }
            }
        }
        if let Ok(v) = std::env::var("CINEMATCH_RETRIEVAL_MATCH_COUNT") {
            match v.parse::<usize>() {
                Ok(n) => self.retrieval.match_count = n,
                Err(_) => {
                    tracing::warn!("ignoring invalid CINEMATCH_RETRIEVAL_MATCH_COUNT value: {v}");
                }
            }
        }
    }

    fn apply_env_overrides_server(&mut self) {
        if let Ok(v) = std::env::var("CINEMATCH_GATEWAY_BIND") {
            self.gateway.bind = v;
        }
        if let Ok(v) = std::env::var("CINEMATCH_GATEWAY_PORT") {
            match v.parse::<u16>() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!("ignoring invalid CINEMATCH_GATEWAY_PORT value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("CINEMATCH_TIMEOUT_CONNECT") {
            match v.parse::<u64>() {
                Ok(secs) => self.timeouts.connect_seconds = secs,
                Err(_) => tracing::warn!("ignoring invalid CINEMATCH_TIMEOUT_CONNECT value: {v}"),
            }
        }
        if let Ok(v) = std::env::var("CINEMATCH_TIMEOUT_REQUEST") {
            match v.parse::<u64>() {
                Ok(secs) => self.timeouts.request_seconds = secs,
                Err(_) => tracing::warn!("ignoring invalid CINEMATCH_TIMEOUT_REQUEST value: {v}"),
            }
        }
    }
}
