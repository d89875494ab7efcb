//! # Core Module
//!
//! 의존성 링크, 싱글톤 관리, 에러 타입을 제공하는 핵심 모듈입니다.
//!
//! ## 모듈 구성
//!
//! ### [`errors`] - 다중 메시지 에러
//! - **TaggedError**: 하나 이상의 메시지를 실행 컨텍스트별 구분자로 결합
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현
//! - **에러 체인**: 코드와 원인(source) 보존
//!
//! ### [`registry`] - 링크 레지스트리
//! - **LinkRegistry**: 타입 식별자 → 의존성 값, 마지막 등록 우선
//!
//! ### [`instance`] - Instance 기능
//! - **Instance**: `instance()`(싱글톤) / `new_instance()`(새 객체)
//! - **Parameter / Arguments**: 명시적인 생성자 파라미터 선언과 해결
//!
//! ### [`container`] - 의존성 컨테이너
//! - **Container**: 레지스트리 + 싱글톤 캐시, 전역 인스턴스와 독립 인스턴스
//! - **register_instance!**: `inventory` 기반 컴파일 타임 등록
//!
//! ## Spring Framework와의 비교
//!
//! | Spring | 이 모듈 |
//! |--------|---------|
//! | `ApplicationContext` | `Container` |
//! | `registerSingleton()` | `add_links()` |
//! | `getBean(Class<T>)` | `T::instance()` |
//! | `@Scope("prototype")` | `T::new_instance()` |
//! | `NoSuchBeanDefinitionException` | 구성 `TaggedError` |
//!
//! ## 트러블슈팅
//!
//! ### 링크 누락
//! ```text
//! Construct parameter 'logger' with type 'my_app::Logger' can't be matched with default links
//! ```
//! **해결**: 시작 시점에 `add_links(Links::new().with(Arc::new(logger)))`로 등록
//!
//! ### 순환 참조
//! ```text
//! Circular dependency detected: Mailer -> Queue -> Mailer
//! ```
//! **해결**: `construct` 안에서 서로의 `instance()`를 요청하지 않도록 재설계

pub mod container;
pub mod errors;
pub mod instance;
pub mod registry;

pub use container::*;
pub use errors::*;
pub use instance::*;
pub use registry::*;
