//! 인스턴스 레지스트리
//!
//! 애플리케이션 프레임워크를 위한 두 가지 기본 도구를 제공합니다.
//!
//! - **TaggedError**: 하나 또는 여러 개의 메시지를 실행 컨텍스트(커맨드라인 / 웹)에
//!   맞는 구분자로 결합하는 에러 타입
//! - **Instance**: 모든 타입에 지연 싱글톤 접근(`instance()`)과 독립적인 새 객체
//!   생성(`new_instance()`)을 제공하는 기능. 생성자 의존성은 타입 식별자로
//!   등록된 링크에서 해결됩니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  add_links()    │ ← 시작 시점 링크 등록
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  LinkRegistry   │ ← 타입 식별자 → 의존성 값
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Container    │ ← 파라미터 해결, 싱글톤 캐시
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ T::instance()   │ ← Arc<T> (instanced = true)
//! │ T::new_instance │ ← T (매번 새 객체)
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use instance_registry::core::{add_links, Instance, Links};
//!
//! add_links(Links::new().with(Arc::new(Logger::new("app"))));
//!
//! let shared = Mailer::instance()?;      // 싱글톤
//! let mut local = Mailer::new_instance()?; // 독립 객체
//! ```

pub mod config;
pub mod core;
pub mod utils;

pub use inventory;
