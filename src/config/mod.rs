//! # Configuration Module
//!
//! 실행 환경에 따라 달라지는 설정을 관리하는 모듈입니다.
//!
//! ## 모듈 구성
//!
//! - [`runtime_config`] - 실행 컨텍스트 감지, `.env` 프로필 로드
//!
//! ## 환경 변수
//!
//! ```bash
//! # 실행 컨텍스트 (cli | web). 에러 메시지 구분자를 결정합니다.
//! export EXECUTION_CONTEXT="web"
//!
//! # .env 프로필 (dev | prod)
//! export PROFILE="prod"
//!
//! # 로그 레벨
//! export RUST_LOG="instance_registry=debug"
//! ```

pub mod runtime_config;

pub use runtime_config::*;
