// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    source: SourceLimits,
    parser: ParserLimits,
    query: QueryLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct SourceLimits {
    max_line_length: usize,
    read_buffer_capacity: usize,
}

#[derive(serde::Deserialize)]
struct ParserLimits {
    max_scope_depth: usize,
}

#[derive(serde::Deserialize)]
struct QueryLimits {
    max_expression_depth: usize,
    max_query_length: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_log_message_length: usize,
    memory_logger_capacity: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=DMP_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=DMP_CONFIG_DIR");

    let profile = env::var("DMP_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("DMP_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the dmp_parser directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}",
            config_path.display(),
            workspace_root.display(),
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig) {
    const ABSOLUTE_MAX_LINE_LENGTH: usize = 64 * 1024 * 1024;

    if config.source.max_line_length == 0
        || config.source.max_line_length > ABSOLUTE_MAX_LINE_LENGTH
    {
        panic!("source.max_line_length must be between 1 and {ABSOLUTE_MAX_LINE_LENGTH}");
    }

    if config.source.read_buffer_capacity == 0 {
        panic!("source.read_buffer_capacity must be non-zero");
    }

    if config.parser.max_scope_depth < 2 {
        panic!("parser.max_scope_depth must allow at least one nested scope");
    }

    if config.query.max_expression_depth == 0 {
        panic!("query.max_expression_depth must be non-zero");
    }

    if config.logging.memory_logger_capacity == 0 {
        panic!("logging.memory_logger_capacity must be non-zero");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod source {{
        pub const MAX_LINE_LENGTH: usize = {};
        pub const READ_BUFFER_CAPACITY: usize = {};
    }}

    pub mod parser {{
        pub const MAX_SCOPE_DEPTH: usize = {};
    }}

    pub mod query {{
        pub const MAX_EXPRESSION_DEPTH: usize = {};
        pub const MAX_QUERY_LENGTH: usize = {};
    }}

    pub mod logging {{
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MEMORY_LOGGER_CAPACITY: usize = {};
    }}
}}
"#,
        profile,
        config.source.max_line_length,
        config.source.read_buffer_capacity,
        config.parser.max_scope_depth,
        config.query.max_expression_depth,
        config.query.max_query_length,
        config.logging.max_log_message_length,
        config.logging.memory_logger_capacity,
    );

    fs::write(output_path, constants_code).unwrap();
}
