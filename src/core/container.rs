//! # Container - 링크 레지스트리와 싱글톤 캐시
//!
//! [`LinkRegistry`]와 타입별 싱글톤 캐시를 하나로 묶은 의존성 컨테이너입니다.
//! 프로세스 전역 컨테이너([`Container::global`])가 `Instance::instance()` /
//! `Instance::new_instance()`의 기본 저장소로 사용되며, 테스트나 격리가 필요한
//! 곳에서는 `Container::new()`로 독립적인 컨테이너를 만들어 넘겨줍니다.
//!
//! ## 동작 방식
//!
//! ```text
//! instance::<T>()
//!    ├─ 캐시 확인 (TypeId → OnceCell)
//!    ├─ 순환 참조 검사 (스레드별 해결 스택 + 스레드 간 대기 그래프)
//!    ├─ create::<T>()
//!    │    ├─ T::parameters() 순회
//!    │    ├─ 타입 식별자로 LinkRegistry 조회
//!    │    └─ T::construct(&arguments)
//!    ├─ set_instanced(true)
//!    └─ Arc<T> 캐싱 후 반환
//! ```
//!
//! 싱글톤 생성은 타입별 `OnceCell` 안에서 수행되므로, 여러 스레드가 동시에
//! 처음 접근해도 하나의 객체만 만들어집니다. 생성에 실패하면 셀은 비어 있는
//! 상태로 남아, 링크를 추가한 뒤 다시 시도할 수 있습니다. 두 스레드가 서로의
//! 싱글톤을 기다리게 되면, 나중에 기다리려는 쪽이 블록 대신 에러를 받습니다.
//!
//! ## 컴파일 타임 등록
//!
//! ```rust,ignore
//! register_instance!(Mailer);
//!
//! fn main() -> AppResult<()> {
//!     add_links(Links::new().with(Arc::new(Logger::default())));
//!     Container::global().initialize_all()?;  // 등록된 모든 싱글톤을 미리 생성
//!     Ok(())
//! }
//! ```

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, ThreadId};

use log::{debug, info, warn};
use once_cell::sync::{Lazy, OnceCell};

use crate::core::errors::{AppResult, TaggedError};
use crate::core::instance::{Arguments, Instance};
use crate::core::registry::{LinkRegistry, Links};
use crate::utils::display_terminal::WarmupReport;
use crate::utils::string_utils::short_type_name;

type SharedInstance = Arc<dyn Any + Send + Sync>;
type InstanceSlot = Arc<OnceCell<SharedInstance>>;

/// 컴파일 타임에 수집되는 Instance 타입 등록 정보
///
/// [`register_instance!`](crate::register_instance) 매크로가 생성합니다.
pub struct InstanceRegistration {
    /// 타입 이름 (출력용)
    pub name: &'static str,
    /// 주어진 컨테이너에서 싱글톤을 생성하는 함수
    pub initializer: fn(&Container) -> AppResult<()>,
}

inventory::collect!(InstanceRegistration);

/// 타입을 [`Container::initialize_all`]의 대상으로 등록합니다.
///
/// ```rust,ignore
/// register_instance!(Mailer);
/// ```
#[macro_export]
macro_rules! register_instance {
    ($ty:ty) => {
        $crate::inventory::submit! {
            $crate::core::container::InstanceRegistration {
                name: stringify!($ty),
                initializer: |container| container.instance::<$ty>().map(|_| ()),
            }
        }
    };
}

thread_local! {
    /// 현재 스레드에서 생성 중인 (컨테이너 주소, 타입) 스택
    static RESOLVING: RefCell<Vec<(usize, TypeId, &'static str)>> = const { RefCell::new(Vec::new()) };
}

fn circular_error(chain: &[&str]) -> TaggedError {
    TaggedError::configuration(format!("Circular dependency detected: {}", chain.join(" -> ")))
}

/// 해결 스택에 타입을 올리고, drop 시 내립니다.
struct ResolutionGuard;

impl ResolutionGuard {
    /// 같은 스레드에서 이미 생성 중인 타입이면 순환 참조 에러를 반환합니다.
    fn check(container: usize, type_id: TypeId, type_name: &'static str) -> AppResult<()> {
        RESOLVING.with(|stack| {
            let stack = stack.borrow();

            let cycle_start = stack
                .iter()
                .position(|(owner, id, _)| *owner == container && *id == type_id);
            match cycle_start {
                Some(start) => {
                    let mut chain: Vec<&str> = stack[start..]
                        .iter()
                        .filter(|(owner, _, _)| *owner == container)
                        .map(|(_, _, name)| short_type_name(name))
                        .collect();
                    chain.push(short_type_name(type_name));
                    Err(circular_error(&chain))
                }
                None => Ok(()),
            }
        })
    }

    fn enter(container: usize, type_id: TypeId, type_name: &'static str) -> AppResult<Self> {
        Self::check(container, type_id, type_name)?;
        RESOLVING.with(|stack| stack.borrow_mut().push((container, type_id, type_name)));
        Ok(ResolutionGuard)
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// 싱글톤 생성 상태 (컨테이너 전체, 모든 스레드)
///
/// - `building`: 생성 중인 타입 → 생성 스레드
/// - `waiting`: 스레드 → 기다리는 타입
///
/// 다른 스레드가 생성 중인 셀을 기다리기 전에 대기 그래프를 따라가,
/// 자기 자신에게 돌아오면 블록하지 않고 순환 참조 에러를 반환합니다.
#[derive(Default)]
struct BuildState {
    building: HashMap<TypeId, (ThreadId, &'static str)>,
    waiting: HashMap<ThreadId, (TypeId, &'static str)>,
}

/// drop 시 현재 스레드의 대기 항목을 제거합니다.
struct WaitingGuard<'a> {
    state: &'a Mutex<BuildState>,
    type_id: TypeId,
}

impl Drop for WaitingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let me = thread::current().id();
        if state.waiting.get(&me).is_some_and(|(id, _)| *id == self.type_id) {
            state.waiting.remove(&me);
        }
    }
}

/// drop 시 생성 중 표시를 제거합니다.
struct BuildingGuard<'a> {
    state: &'a Mutex<BuildState>,
    type_id: TypeId,
}

impl Drop for BuildingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .building
            .remove(&self.type_id);
    }
}

/// 의존성 컨테이너
#[derive(Default)]
pub struct Container {
    links: LinkRegistry,
    instances: RwLock<HashMap<TypeId, InstanceSlot>>,
    build_state: Mutex<BuildState>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// 프로세스 전역 컨테이너
    pub fn global() -> &'static Container {
        &GLOBAL
    }

    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }

    /// 링크를 병합합니다. 같은 키는 마지막 값으로 덮어씁니다.
    pub fn add_links(&self, links: Links) -> usize {
        self.links.add_links(links)
    }

    /// `T`의 싱글톤을 반환합니다.
    ///
    /// 처음 호출될 때 [`create`](Self::create)로 객체를 만들고
    /// `set_instanced(true)`를 호출한 뒤 캐시합니다. 이후 호출은 같은 `Arc`를
    /// 반환합니다.
    ///
    /// # Errors
    ///
    /// - 생성자 파라미터를 해결할 수 없는 경우 (구성 에러)
    /// - `T`의 생성이 자기 자신을 다시 요청하는 경우. 같은 스레드든,
    ///   서로의 싱글톤을 기다리는 여러 스레드든 모두 순환 참조 에러가 됩니다.
    /// - `T::construct`가 반환한 에러
    pub fn instance<T: Instance>(&self) -> AppResult<Arc<T>> {
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();
        let slot = self.slot(type_id);

        if let Some(shared) = slot.get() {
            return Self::downcast::<T>(shared);
        }

        ResolutionGuard::check(self.address(), type_id, type_name)?;
        let _waiting = self.wait_for(type_id, type_name)?;

        let shared = slot.get_or_try_init(|| {
            let _building = self.start_building(type_id, type_name);
            let mut created = self.create::<T>()?;
            created.set_instanced(true);
            info!("📦 Instantiated: {}", short_type_name(type_name));

            let shared: SharedInstance = Arc::new(created);
            Ok::<_, TaggedError>(shared)
        })?;

        Self::downcast::<T>(shared)
    }

    /// 링크로 생성자 인자를 해결해 새 `T`를 만듭니다. 캐시하지 않습니다.
    ///
    /// # Errors
    ///
    /// - 타입이 선언되지 않은 파라미터
    /// - 타입 식별자가 레지스트리에 없는 파라미터
    /// - `T::construct`가 같은 스레드에서 다시 `T`를 생성하려는 경우
    pub fn create<T: Instance>(&self) -> AppResult<T> {
        let _guard = ResolutionGuard::enter(
            self.address(),
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
        )?;
        let arguments = self.resolve_arguments::<T>()?;
        T::construct(&arguments)
    }

    pub fn is_instantiated<T: Instance>(&self) -> bool {
        self.read_instances()
            .get(&TypeId::of::<T>())
            .is_some_and(|slot| slot.get().is_some())
    }

    /// 생성이 완료된 싱글톤 수
    pub fn instance_count(&self) -> usize {
        self.read_instances()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// 모든 링크와 싱글톤을 제거합니다.
    ///
    /// 이미 반환된 `Arc`는 그대로 유효하며, 이후의 `instance()` 호출은 새 싱글톤을
    /// 만듭니다.
    pub fn clear(&self) {
        self.instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.links.clear();
        debug!("Container cleared");
    }

    /// `register_instance!`로 등록된 모든 타입의 싱글톤을 미리 생성합니다.
    ///
    /// 하나가 실패해도 나머지는 계속 생성하며, 실패한 항목들의 메시지를 모아
    /// 하나의 다중 메시지 에러로 반환합니다.
    ///
    /// # Returns
    ///
    /// 생성(또는 이미 존재 확인)된 싱글톤 수
    pub fn initialize_all(&self) -> AppResult<usize> {
        let mut registrations: Vec<&InstanceRegistration> =
            inventory::iter::<InstanceRegistration>.into_iter().collect();
        registrations.sort_by_key(|registration| registration.name);

        let mut report = WarmupReport::new();
        let mut failures = Vec::new();

        for registration in &registrations {
            match (registration.initializer)(self) {
                Ok(()) => report.created(registration.name),
                Err(e) => {
                    warn!("Failed to create {}: {}", registration.name, e);
                    report.failed(registration.name, e.messages().join("\n"));
                    failures.push(format!("{}: {}", registration.name, e.message()));
                }
            }
        }

        report.print(self.links.len());

        if failures.is_empty() {
            Ok(report.created_count())
        } else {
            Err(TaggedError::new(failures))
        }
    }

    fn resolve_arguments<T: Instance>(&self) -> AppResult<Arguments> {
        let owner = std::any::type_name::<T>();
        let mut arguments = Arguments::new(owner);

        for parameter in T::parameters() {
            let Some(type_key) = parameter.type_key() else {
                return Err(TaggedError::configuration(format!(
                    "Construct parameter '{}' must have a type",
                    parameter.name()
                )));
            };

            let Some(value) = self.links.get(type_key) else {
                return Err(TaggedError::configuration(format!(
                    "Construct parameter '{}' with type '{}' can't be matched with default links",
                    parameter.name(),
                    type_key
                )));
            };

            debug!(
                "Resolved {}::{} from link '{}'",
                short_type_name(owner),
                parameter.name(),
                type_key
            );
            arguments.insert(type_key.to_string(), value);
        }

        Ok(arguments)
    }

    /// 현재 스레드가 `type_id`를 기다린다고 기록합니다.
    ///
    /// 다른 스레드가 생성 중이면 그 스레드가 기다리는 타입을 따라가며,
    /// 현재 스레드가 생성 중인 타입에 닿으면 순환 참조 에러를 반환합니다.
    fn wait_for(&self, type_id: TypeId, type_name: &'static str) -> AppResult<WaitingGuard<'_>> {
        let me = thread::current().id();
        let mut state = self.build_state.lock().unwrap_or_else(PoisonError::into_inner);

        let mut chain = vec![short_type_name(type_name)];
        let mut current = type_id;
        for _ in 0..=state.waiting.len() {
            let Some(&(owner, _)) = state.building.get(&current) else {
                break;
            };
            if owner == me {
                chain.push(short_type_name(type_name));
                return Err(circular_error(&chain));
            }
            let Some(&(next, next_name)) = state.waiting.get(&owner) else {
                break;
            };
            chain.push(short_type_name(next_name));
            current = next;
        }

        state.waiting.insert(me, (type_id, type_name));
        Ok(WaitingGuard {
            state: &self.build_state,
            type_id,
        })
    }

    /// 현재 스레드를 `type_id`의 생성자로 기록합니다. 생성자는 기다리지 않습니다.
    fn start_building(&self, type_id: TypeId, type_name: &'static str) -> BuildingGuard<'_> {
        let me = thread::current().id();
        let mut state = self.build_state.lock().unwrap_or_else(PoisonError::into_inner);
        state.waiting.remove(&me);
        state.building.insert(type_id, (me, type_name));

        BuildingGuard {
            state: &self.build_state,
            type_id,
        }
    }

    fn slot(&self, type_id: TypeId) -> InstanceSlot {
        if let Some(slot) = self.read_instances().get(&type_id) {
            return Arc::clone(slot);
        }

        let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(instances.entry(type_id).or_default())
    }

    fn read_instances(&self) -> std::sync::RwLockReadGuard<'_, HashMap<TypeId, InstanceSlot>> {
        self.instances.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn downcast<T: Instance>(shared: &SharedInstance) -> AppResult<Arc<T>> {
        Arc::clone(shared).downcast::<T>().map_err(|_| {
            TaggedError::configuration(format!(
                "Type mismatch in instance cache for '{}'",
                std::any::type_name::<T>()
            ))
        })
    }

    fn address(&self) -> usize {
        self as *const Self as usize
    }
}

/// 전역 컨테이너 인스턴스
static GLOBAL: Lazy<Container> = Lazy::new(Container::new);

/// 전역 컨테이너에 링크를 병합합니다.
pub fn add_links(links: Links) -> usize {
    Container::global().add_links(links)
}
