//! # Tagged Error - 다중 메시지 에러 타입
//!
//! 하나 또는 여러 개의 사람이 읽을 수 있는 메시지를 담는 에러 타입입니다.
//! 메시지 목록은 실행 컨텍스트(커맨드라인 / 웹 요청 처리)에 맞는 구분자로
//! 합쳐져 하나의 렌더링된 메시지가 됩니다.
//!
//! ## 구분자 규칙
//!
//! | 실행 컨텍스트 | 구분자 |
//! |---------------|--------|
//! | `CommandLine` | `"\r\n"` |
//! | `Web` | `"<br/>"` |
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use instance_registry::core::errors::{AppResult, TaggedError};
//!
//! fn validate(name: &str, email: &str) -> AppResult<()> {
//!     let mut problems = Vec::new();
//!     if name.is_empty() {
//!         problems.push("Name is required");
//!     }
//!     if !email.contains('@') {
//!         problems.push("Email is invalid");
//!     }
//!     if problems.is_empty() {
//!         Ok(())
//!     } else {
//!         Err(TaggedError::new(problems).with_code(400))
//!     }
//! }
//! ```
//!
//! ## 에러 체인
//!
//! 외부 에러는 [`ErrorContext`]를 통해 원인(source)을 보존한 채로 변환됩니다.
//!
//! ```rust,ignore
//! let raw = std::fs::read_to_string("links.toml")
//!     .context("Failed to read link definitions")?;
//! ```

use std::error::Error as StdError;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::config::ExecutionContext;

/// 구성(Configuration) 에러에 사용되는 에러 코드
///
/// 생성자 파라미터를 해결할 수 없을 때 발생하는 에러에 부여됩니다.
/// HTTP 상태 코드 범위 밖의 값이므로 웹 응답에서는 500으로 매핑됩니다.
pub const CONFIGURATION_ERROR_CODE: i64 = 1;

type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// `TaggedError` 생성 입력
///
/// 단일 문자열 또는 순서가 있는 문자열 목록을 받습니다.
/// `From` 구현 덕분에 `TaggedError::new("...")`, `TaggedError::new(vec![...])`
/// 형태로 바로 사용할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageInput {
    /// 단일 메시지
    Single(String),
    /// 순서가 있는 메시지 목록
    List(Vec<String>),
}

impl MessageInput {
    fn is_empty(&self) -> bool {
        match self {
            MessageInput::Single(message) => message.is_empty(),
            MessageInput::List(messages) => messages.is_empty(),
        }
    }

    fn into_messages(self) -> Vec<String> {
        match self {
            MessageInput::Single(message) => vec![message],
            MessageInput::List(messages) => messages,
        }
    }
}

impl From<&str> for MessageInput {
    fn from(message: &str) -> Self {
        MessageInput::Single(message.to_string())
    }
}

impl From<String> for MessageInput {
    fn from(message: String) -> Self {
        MessageInput::Single(message)
    }
}

impl From<Vec<String>> for MessageInput {
    fn from(messages: Vec<String>) -> Self {
        MessageInput::List(messages)
    }
}

impl From<Vec<&str>> for MessageInput {
    fn from(messages: Vec<&str>) -> Self {
        MessageInput::List(messages.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for MessageInput {
    fn from(messages: &[&str]) -> Self {
        MessageInput::List(messages.iter().map(|m| m.to_string()).collect())
    }
}

/// 하나 이상의 메시지를 담는 애플리케이션 에러
///
/// 생성 이후에는 변경되지 않습니다. 렌더링된 메시지(`message()`)는
/// 생성 시점의 실행 컨텍스트 구분자로 한 번만 계산됩니다.
///
/// # 불변 조건
///
/// - `messages()`는 항상 최소 하나의 메시지를 가집니다.
/// - 빈 입력은 타입 이름(`type_name::<TaggedError>()`) 하나로 대체됩니다.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TaggedError {
    messages: Vec<String>,
    message: String,
    code: i64,
    context: ExecutionContext,
    #[source]
    source: Option<BoxedCause>,
}

impl TaggedError {
    /// 현재 실행 컨텍스트의 구분자로 에러를 생성합니다.
    pub fn new(input: impl Into<MessageInput>) -> Self {
        Self::for_context(input, ExecutionContext::current())
    }

    /// 지정된 실행 컨텍스트의 구분자로 에러를 생성합니다.
    ///
    /// 환경 변수와 무관하게 렌더링 결과를 고정해야 할 때 사용합니다.
    pub fn for_context(input: impl Into<MessageInput>, context: ExecutionContext) -> Self {
        let mut input = input.into();
        if input.is_empty() {
            input = MessageInput::Single(std::any::type_name::<Self>().to_string());
        }

        let messages = input.into_messages();
        let message = messages.join(context.separator());

        Self {
            messages,
            message,
            code: 0,
            context,
            source: None,
        }
    }

    /// 생성자 파라미터 해결 실패 등 구성 에러를 생성합니다.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(message.into()).with_code(CONFIGURATION_ERROR_CODE)
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// 원인 에러를 연결합니다. `Error::source()`로 조회됩니다.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn is_configuration(&self) -> bool {
        self.code == CONFIGURATION_ERROR_CODE
    }

    /// 메시지 결합에 사용된 구분자
    pub fn implode_symbols(&self) -> &'static str {
        self.context.separator()
    }

    pub fn execution_context(&self) -> ExecutionContext {
        self.context
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, TaggedError>;

/// 웹 응답 본문
#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    messages: &'a [String],
    code: i64,
}

impl ResponseError for TaggedError {
    /// 에러 코드가 유효한 4xx/5xx 상태 코드이면 그대로 사용하고,
    /// 그렇지 않으면 500 Internal Server Error로 응답합니다.
    fn status_code(&self) -> StatusCode {
        u16::try_from(self.code)
            .ok()
            .filter(|code| (400..600).contains(code))
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl TaggedError {
    fn body(&self) -> ErrorBody<'_> {
        ErrorBody {
            error: &self.message,
            messages: &self.messages,
            code: self.code,
        }
    }
}

/// 외부 라이브러리 에러를 `TaggedError`로 변환하는 확장 trait
///
/// 원본 에러는 버려지지 않고 `source`로 연결됩니다.
///
/// ```rust,ignore
/// use instance_registry::core::errors::ErrorContext;
///
/// let port: u16 = raw_port.parse().context("PORT must be a number")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 메시지와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저로 지연 평가된 컨텍스트 메시지를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| TaggedError::new(format!("{}: {}", msg, e)).with_source(e))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| TaggedError::new(format!("{}: {}", f(), e)).with_source(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_list_is_joined_with_crlf_on_command_line() {
        let error = TaggedError::for_context(
            vec!["Name is required", "Email is invalid"],
            ExecutionContext::CommandLine,
        );

        assert_eq!(error.messages(), ["Name is required", "Email is invalid"]);
        assert_eq!(error.message(), "Name is required\r\nEmail is invalid");
        assert_eq!(error.implode_symbols(), "\r\n");
    }

    #[test]
    fn test_list_is_joined_with_br_on_web() {
        let error = TaggedError::for_context(vec!["first", "second", "third"], ExecutionContext::Web);

        assert_eq!(error.messages().len(), 3);
        assert_eq!(error.message(), "first<br/>second<br/>third");
        assert_eq!(error.to_string(), error.message());
    }

    #[test]
    fn test_single_message() {
        let error = TaggedError::for_context("Something broke", ExecutionContext::Web);

        assert_eq!(error.messages(), ["Something broke"]);
        assert_eq!(error.message(), "Something broke");
        assert_eq!(error.code(), 0);
        assert!(error.source().is_none());
    }

    #[test]
    fn test_empty_input_defaults_to_type_name() {
        let expected = std::any::type_name::<TaggedError>();

        let from_list = TaggedError::new(Vec::<String>::new());
        assert_eq!(from_list.messages(), [expected]);
        assert_eq!(from_list.message(), expected);

        let from_string = TaggedError::new("");
        assert_eq!(from_string.messages(), [expected]);
        assert!(from_string.message().ends_with("TaggedError"));
    }

    #[test]
    fn test_list_with_single_empty_message_is_kept() {
        let error = TaggedError::for_context(vec![""], ExecutionContext::CommandLine);
        assert_eq!(error.messages(), [""]);
    }

    #[test]
    fn test_source_chain() {
        let inner = TaggedError::new("inner");
        let outer = TaggedError::new("outer").with_code(7).with_source(inner);

        assert_eq!(outer.code(), 7);
        let source = outer.source().expect("source should be set");
        assert_eq!(source.to_string(), "inner");
    }

    #[test]
    fn test_configuration_error() {
        let error = TaggedError::configuration("Construct parameter 'x' must have a type");

        assert!(error.is_configuration());
        assert_eq!(error.code(), CONFIGURATION_ERROR_CODE);
        assert_eq!(error.messages().len(), 1);
    }

    #[test]
    fn test_status_code_follows_http_codes() {
        let bad_request = TaggedError::new("Email is required").with_code(400);
        assert_eq!(bad_request.status_code(), StatusCode::BAD_REQUEST);

        let not_found = TaggedError::new("User not found").with_code(404);
        assert_eq!(not_found.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_status_code_defaults_to_internal_error() {
        for code in [0, CONFIGURATION_ERROR_CODE, 200, 302, 600, -404, i64::MAX] {
            let error = TaggedError::new("broken").with_code(code);
            assert_eq!(
                error.error_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "code {} should map to 500",
                code
            );
        }
    }

    #[test]
    fn test_response_body_shape() {
        let error = TaggedError::for_context(vec!["a", "b"], ExecutionContext::Web).with_code(422);
        let body = serde_json::to_value(error.body()).unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "error": "a<br/>b",
                "messages": ["a", "b"],
                "code": 422
            })
        );
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    const CHILD_MARKER: &str = "TAGGED_ERROR_SEPARATOR_CHILD";

    #[test]
    fn test_new_takes_separator_from_environment() {
        if let Ok(expected) = std::env::var(CHILD_MARKER) {
            let error = TaggedError::new(vec!["first", "second"]);
            assert_eq!(error.message(), format!("first{}second", expected));
            return;
        }

        let exe = std::env::current_exe().expect("test binary path");
        for (context, separator) in [("web", "<br/>"), ("cli", "\r\n")] {
            let status = std::process::Command::new(&exe)
                .args([
                    "--exact",
                    "core::errors::tests::test_new_takes_separator_from_environment",
                    "--test-threads=1",
                ])
                .env("EXECUTION_CONTEXT", context)
                .env(CHILD_MARKER, separator)
                .status()
                .expect("failed to run test binary");

            assert!(status.success(), "EXECUTION_CONTEXT={} should join with {:?}", context, separator);
        }
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<u16, std::num::ParseIntError> = "not-a-port".parse::<u16>();
        let app_result = result.context("PORT must be a number");

        let error = app_result.expect_err("parse should fail");
        assert!(error.message().starts_with("PORT must be a number: "));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_with_context_closure() {
        let result: Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let error = result
            .with_context(|| format!("Failed to read {}", ".env.dev"))
            .expect_err("should fail");

        assert_eq!(error.messages(), ["Failed to read .env.dev: missing"]);
    }
}
