//! 실행 컨텍스트 및 환경 설정 관리 모듈
//!
//! 프로세스가 커맨드라인에서 실행 중인지, 웹 요청 처리 컨텍스트에서
//! 실행 중인지를 판별합니다. 이 값은 [`TaggedError`](crate::core::errors::TaggedError)의
//! 메시지 구분자를 결정합니다.

use std::env;

use log::{error, info};

/// 커맨드라인 컨텍스트의 메시지 구분자
pub const COMMAND_LINE_SEPARATOR: &str = "\r\n";

/// 웹 컨텍스트의 메시지 구분자
pub const WEB_SEPARATOR: &str = "<br/>";

/// 애플리케이션 실행 컨텍스트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionContext {
    /// 터미널/커맨드라인 실행 (기본값)
    #[default]
    CommandLine,
    /// HTTP 요청 처리 등 커맨드라인이 아닌 실행
    Web,
}

impl ExecutionContext {
    /// 현재 실행 컨텍스트를 감지합니다.
    ///
    /// `EXECUTION_CONTEXT` 환경 변수를 확인하며, 설정되지 않은 경우
    /// Rust 바이너리의 기본 실행 형태인 `CommandLine`을 사용합니다.
    ///
    /// # Examples
    ///
    /// ```bash
    /// # 웹 서버로 실행
    /// EXECUTION_CONTEXT=web cargo run
    /// ```
    pub fn current() -> Self {
        Self::detect(|key| env::var(key).ok())
    }

    /// 주어진 조회 함수로 `EXECUTION_CONTEXT` 값을 읽어 컨텍스트를 결정합니다.
    pub fn detect<F>(lookup: F) -> Self
    where
        F: FnOnce(&str) -> Option<String>,
    {
        lookup("EXECUTION_CONTEXT")
            .map(|value| Self::from_str(&value))
            .unwrap_or_default()
    }

    /// 문자열에서 ExecutionContext를 생성합니다.
    ///
    /// 대소문자를 구분하지 않으며, 알 수 없는 값은 `CommandLine`으로 처리합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "web" | "http" | "server" | "fpm" | "cgi" => ExecutionContext::Web,
            _ => ExecutionContext::CommandLine,
        }
    }

    /// 메시지 목록을 합칠 때 사용하는 구분자를 반환합니다.
    pub fn separator(&self) -> &'static str {
        match self {
            ExecutionContext::CommandLine => COMMAND_LINE_SEPARATOR,
            ExecutionContext::Web => WEB_SEPARATOR,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionContext::CommandLine => "cli",
            ExecutionContext::Web => "web",
        }
    }
}

/// 환경별 설정 파일을 로드합니다
///
/// `PROFILE` 환경변수에 따라 적절한 .env 파일을 로드합니다.
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
pub fn load_env_file() {
    let profile = env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" | "dev" => {
            let filename = format!(".env.{}", profile);
            match dotenv::from_filename(&filename) {
                Ok(_) => info!("{} 파일 로드 됨", filename),
                Err(e) => error!("{} 파일 로드 실패: {}", filename, e),
            }
        }
        _ => {
            dotenv::dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_string() {
        assert_eq!(ExecutionContext::from_str("cli"), ExecutionContext::CommandLine);
        assert_eq!(ExecutionContext::from_str("web"), ExecutionContext::Web);
        assert_eq!(ExecutionContext::from_str("HTTP"), ExecutionContext::Web);
        assert_eq!(ExecutionContext::from_str(" Server "), ExecutionContext::Web);
        assert_eq!(ExecutionContext::from_str("unknown"), ExecutionContext::CommandLine);
        assert_eq!(ExecutionContext::from_str(""), ExecutionContext::CommandLine);
    }

    #[test]
    fn test_separator_for_each_context() {
        assert_eq!(ExecutionContext::CommandLine.separator(), "\r\n");
        assert_eq!(ExecutionContext::Web.separator(), "<br/>");
    }

    #[test]
    fn test_default_context() {
        assert_eq!(ExecutionContext::default(), ExecutionContext::CommandLine);

        if env::var("EXECUTION_CONTEXT").is_err() {
            assert_eq!(ExecutionContext::current(), ExecutionContext::CommandLine);
        }
    }

    #[test]
    fn test_detect_reads_execution_context_key() {
        let web = ExecutionContext::detect(|key| {
            assert_eq!(key, "EXECUTION_CONTEXT");
            Some("web".to_string())
        });
        assert_eq!(web, ExecutionContext::Web);

        assert_eq!(ExecutionContext::detect(|_| None), ExecutionContext::CommandLine);
        assert_eq!(
            ExecutionContext::detect(|_| Some("cli".to_string())),
            ExecutionContext::CommandLine
        );
    }

    #[test]
    fn test_as_str_roundtrip() {
        for context in [ExecutionContext::CommandLine, ExecutionContext::Web] {
            assert_eq!(ExecutionContext::from_str(context.as_str()), context);
        }
    }
}
