//! 配置与可观测性模块集成测试
//!
//! 配置加载会读写进程环境变量，统一放在单个测试中顺序执行。

// ============================================================================
// 配置加载测试
// ============================================================================

mod config_tests {
    use eligibility_shared::config::AppConfig;
    use std::fs;

    #[test]
    fn test_layered_config_loading() {
        let dir = std::env::temp_dir().join(format!("rules-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("default.toml"),
            "[server]\nhost = \"127.0.0.1\"\nport = 9000\n\n[observability]\nlog_level = \"debug\"\n",
        )
        .unwrap();
        fs::write(dir.join("staging.toml"), "[observability]\nlog_format = \"json\"\n").unwrap();

        // SAFETY: 本测试二进制中只有该测试修改环境变量
        unsafe {
            std::env::set_var("CONFIG_DIR", &dir);
            std::env::set_var("RULES_ENV", "staging");
            std::env::set_var("RULES_OBSERVABILITY__LOG_LEVEL", "warn");
        }
        let layered = AppConfig::load("layered-service").unwrap();

        unsafe {
            std::env::set_var("LAYERED_SERVICE_PORT", "9100");
        }
        let with_port = AppConfig::load("layered-service").unwrap();

        unsafe {
            std::env::remove_var("CONFIG_DIR");
            std::env::remove_var("RULES_ENV");
            std::env::remove_var("RULES_OBSERVABILITY__LOG_LEVEL");
            std::env::remove_var("LAYERED_SERVICE_PORT");
        }
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(layered.environment, "staging");
        assert_eq!(layered.server_addr(), "127.0.0.1:9000");
        // 环境变量覆盖文件配置
        assert_eq!(layered.observability.log_level, "warn");
        assert!(layered.observability.json_logs());

        assert_eq!(with_port.server.port, 9100);
    }
}

// ============================================================================
// 中间件测试
// ============================================================================

mod middleware_tests {
    use eligibility_shared::observability::middleware::RequestId;

    #[test]
    fn test_request_id_creation() {
        let id = RequestId("test-id-123".to_string());
        assert_eq!(id.as_str(), "test-id-123");
    }

    #[test]
    fn test_request_id_clone() {
        let id1 = RequestId("clone-test".to_string());
        let id2 = id1.clone();
        assert_eq!(id1.as_str(), id2.as_str());
    }
}

// ============================================================================
// 日志初始化测试
// ============================================================================

mod init_tests {
    use eligibility_shared::{config::ObservabilityConfig, observability};

    #[test]
    fn test_init_twice_returns_error() {
        let config = ObservabilityConfig::default();
        assert!(observability::init("init-test", &config).is_ok());
        assert!(observability::init("init-test", &config).is_err());
    }
}
