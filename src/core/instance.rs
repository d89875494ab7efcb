//! # Instance - 싱글톤 접근과 새 인스턴스 생성
//!
//! Instance는 싱글톤의 동의어이지만, 같은 타입의 새 객체 생성을 막지 않습니다.
//! 대부분의 경우 프로젝트 전역에서 동일한 불변 객체가 필요합니다:
//!
//! ```rust,ignore
//! let mailer = Mailer::instance()?;   // 항상 같은 Arc<Mailer>
//! mailer.send(&message)?;
//! ```
//!
//! 필요하다면 개별적으로 변경 가능한 로컬 객체를 만들 수도 있습니다:
//!
//! ```rust,ignore
//! let mut mailer = Mailer::new_instance()?;  // 매번 새 Mailer
//! mailer.set_sender("noreply@example.com");
//! ```
//!
//! ## 생성자 파라미터 선언
//!
//! 런타임 리플렉션 대신 각 타입이 생성자 파라미터를 직접 선언합니다.
//! 파라미터의 타입 식별자는 [`LinkRegistry`](crate::core::registry::LinkRegistry)의
//! 키와 매칭되고, 해결된 값은 [`Arguments`]로 전달됩니다.
//!
//! ```rust,ignore
//! struct Mailer {
//!     logger: Arc<Logger>,
//!     instanced: bool,
//! }
//!
//! impl Instance for Mailer {
//!     fn parameters() -> Vec<Parameter> {
//!         vec![Parameter::of::<Logger>("logger")]
//!     }
//!
//!     fn construct(args: &Arguments) -> AppResult<Self> {
//!         Ok(Self { logger: args.get::<Logger>()?, instanced: false })
//!     }
//!
//!     fn set_instanced(&mut self, instanced: bool) { self.instanced = instanced; }
//!     fn is_instanced(&self) -> bool { self.instanced }
//! }
//! ```
//!
//! `instanced` 플래그를 확인해 싱글톤 객체의 불변성을 구현하는 것을 권장합니다.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::container::Container;
use crate::core::errors::{AppResult, TaggedError};
use crate::core::registry::Link;

/// 선언된 생성자 파라미터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: &'static str,
    type_key: Option<String>,
}

impl Parameter {
    /// `D` 타입의 파라미터. 타입 식별자는 `type_name::<D>()`입니다.
    pub fn of<D: Any + Send + Sync>(name: &'static str) -> Self {
        Self::typed(name, std::any::type_name::<D>())
    }

    /// 임의의 타입 식별자를 가진 파라미터
    pub fn typed(name: &'static str, type_key: impl Into<String>) -> Self {
        Self {
            name,
            type_key: Some(type_key.into()),
        }
    }

    /// 타입이 선언되지 않은 파라미터. 해결 시 항상 구성 에러가 됩니다.
    pub fn untyped(name: &'static str) -> Self {
        Self { name, type_key: None }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_key(&self) -> Option<&str> {
        self.type_key.as_deref()
    }
}

/// 레지스트리에서 해결된 생성자 인자 (타입 식별자 → 값)
pub struct Arguments {
    owner: &'static str,
    values: HashMap<String, Link>,
}

impl Arguments {
    pub(crate) fn new(owner: &'static str) -> Self {
        Self {
            owner,
            values: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, type_key: String, value: Link) {
        self.values.insert(type_key, value);
    }

    /// `type_name::<D>()`로 선언된 인자를 꺼냅니다.
    pub fn get<D: Any + Send + Sync>(&self) -> AppResult<Arc<D>> {
        self.get_keyed::<D>(std::any::type_name::<D>())
    }

    /// 명시적 타입 식별자로 선언된 인자를 꺼냅니다.
    pub fn get_keyed<D: Any + Send + Sync>(&self, type_key: &str) -> AppResult<Arc<D>> {
        let value = self.values.get(type_key).cloned().ok_or_else(|| {
            TaggedError::configuration(format!(
                "Argument with type '{}' was not declared by '{}'",
                type_key, self.owner
            ))
        })?;

        value.downcast::<D>().map_err(|_| {
            TaggedError::configuration(format!(
                "Link '{}' does not hold a value of type '{}'",
                type_key,
                std::any::type_name::<D>()
            ))
        })
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.values.contains_key(type_key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 싱글톤 접근(`instance`)과 새 인스턴스 생성(`new_instance`) 기능
///
/// `parameters`와 `construct`만 구현하면, 전역 [`Container`]를 사용하는
/// `instance()` / `new_instance()`가 제공됩니다. 명시적 컨테이너를 사용하려면
/// [`Container::instance`] / [`Container::create`]를 호출합니다.
pub trait Instance: Sized + Send + Sync + 'static {
    /// 생성자 파라미터 목록 (선언 순서)
    fn parameters() -> Vec<Parameter>;

    /// 해결된 인자로 새 객체를 생성합니다.
    fn construct(args: &Arguments) -> AppResult<Self>;

    /// 싱글톤으로 지정될 때 `true`로 호출됩니다.
    fn set_instanced(&mut self, instanced: bool);

    fn is_instanced(&self) -> bool;

    /// 전역 컨테이너의 싱글톤을 반환합니다. 없으면 생성합니다.
    fn instance() -> AppResult<Arc<Self>> {
        Container::global().instance::<Self>()
    }

    /// 전역 컨테이너의 링크로 새 객체를 생성합니다. 캐시하지 않습니다.
    fn new_instance() -> AppResult<Self> {
        Container::global().create::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Clock;

    #[test]
    fn test_parameter_of_uses_type_name() {
        let parameter = Parameter::of::<Clock>("clock");

        assert_eq!(parameter.name(), "clock");
        assert_eq!(parameter.type_key(), Some(std::any::type_name::<Clock>()));
    }

    #[test]
    fn test_untyped_parameter_has_no_key() {
        let parameter = Parameter::untyped("anything");
        assert_eq!(parameter.type_key(), None);
    }

    #[test]
    fn test_arguments_get_downcasts() {
        let mut args = Arguments::new("Owner");
        args.insert("port".to_string(), Arc::new(8080u16));

        assert_eq!(*args.get_keyed::<u16>("port").unwrap(), 8080);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_arguments_missing_type_is_configuration_error() {
        let args = Arguments::new("Owner");
        let error = args.get::<Clock>().err().expect("missing argument");

        assert!(error.is_configuration());
        assert!(error.message().contains("Owner"));
        assert!(args.is_empty());
    }

    #[test]
    fn test_arguments_type_mismatch() {
        let mut args = Arguments::new("Owner");
        args.insert("port".to_string(), Arc::new("eighty".to_string()));

        let error = args.get_keyed::<u16>("port").err().expect("type mismatch");
        assert!(error.message().contains("does not hold a value of type 'u16'"));
    }
}
