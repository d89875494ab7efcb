//! # Link Registry - 타입 식별자 기반 의존성 저장소
//!
//! 타입 식별자(보통 `std::any::type_name::<T>()`로 얻는 전체 경로 문자열)를
//! 키로, 미리 생성된 의존성 값을 값으로 가지는 매핑입니다.
//! 애플리케이션 시작 시점에 채워지며, 이후 [`Instance`](crate::core::instance::Instance)
//! 타입의 생성자 파라미터를 해결하는 데 사용됩니다.
//!
//! ## 병합 규칙
//!
//! `add_links`는 기존 매핑에 새 항목을 병합하며, 같은 키가 이미 있으면
//! 마지막으로 등록된 값이 이전 값을 덮어씁니다. 제거 연산은 없습니다.
//!
//! ```rust,ignore
//! let registry = LinkRegistry::new();
//! registry.add_links(Links::new().with(Arc::new(Logger::new("v1"))));
//! registry.add_links(Links::new().with(Arc::new(Logger::new("v2"))));
//! // Logger → v2
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, warn};

use crate::utils::string_utils::short_type_name;

/// 등록된 의존성 값
pub type Link = Arc<dyn Any + Send + Sync>;

/// `add_links`에 전달할 키 → 값 묶음
///
/// 등록 순서를 유지하므로, 같은 키가 두 번 들어오면 뒤의 값이 남습니다.
#[derive(Default)]
pub struct Links {
    entries: Vec<(String, Link)>,
}

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// 값의 타입 이름(`type_name::<T>()`)을 키로 추가합니다.
    pub fn with<T: Any + Send + Sync>(self, value: Arc<T>) -> Self {
        self.with_key(std::any::type_name::<T>(), value)
    }

    /// 명시적인 키로 값을 추가합니다.
    pub fn with_key<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: Arc<T>) -> Self {
        self.entries.push((key.into(), value as Link));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Links {
    type Item = (String, Link);
    type IntoIter = std::vec::IntoIter<(String, Link)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Link)> for Links {
    fn from_iter<I: IntoIterator<Item = (String, Link)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// 타입 식별자 → 의존성 값 저장소
///
/// `RwLock`으로 보호되므로 여러 스레드에서 동시에 읽고 쓸 수 있습니다.
#[derive(Default)]
pub struct LinkRegistry {
    links: RwLock<HashMap<String, Link>>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 주어진 링크들을 병합합니다. 기존 키는 덮어씁니다.
    ///
    /// # Returns
    ///
    /// 병합된 항목 수
    pub fn add_links(&self, links: Links) -> usize {
        let mut map = self.write();
        let mut count = 0;

        for (key, value) in links {
            debug!("🔗 Linking: {}", short_type_name(&key));
            if map.insert(key.clone(), value).is_some() {
                warn!("Link '{}' was overwritten", key);
            }
            count += 1;
        }

        count
    }

    pub fn get(&self, key: &str) -> Option<Link> {
        self.read().get(key).cloned()
    }

    /// 타입 이름을 키로 값을 꺼내 `Arc<T>`로 다운캐스트합니다.
    pub fn get_typed<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.get(std::any::type_name::<T>())
            .and_then(|link| link.downcast::<T>().ok())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// 등록된 키 목록 (정렬됨)
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub(crate) fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Link>> {
        self.links.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Link>> {
        self.links.write().unwrap_or_else(PoisonError::into_inner)
    }
}
