//! 인스턴스 레지스트리 데모 애플리케이션
//!
//! 링크를 등록하고, 등록된 모든 싱글톤을 미리 생성한 뒤
//! `instance()`와 `new_instance()`의 차이를 보여줍니다.

use std::process::ExitCode;
use std::sync::Arc;

use env_logger::Env;
use log::{error, info};
use instance_registry::config::{load_env_file, ExecutionContext};
use instance_registry::core::{add_links, AppResult, Arguments, Container, Instance, Links, Parameter};
use instance_registry::register_instance;

/// 애플리케이션 설정 (링크로 등록됨)
#[derive(Debug)]
struct AppSettings {
    greeting: String,
}

/// 설정을 주입받는 인사 서비스
struct Greeter {
    settings: Arc<AppSettings>,
    instanced: bool,
    greeted: u32,
}

impl Greeter {
    fn greet(&mut self, name: &str) -> String {
        self.greeted += 1;
        format!("{}, {}!", self.settings.greeting, name)
    }
}

impl Instance for Greeter {
    fn parameters() -> Vec<Parameter> {
        vec![Parameter::of::<AppSettings>("settings")]
    }

    fn construct(args: &Arguments) -> AppResult<Self> {
        Ok(Self {
            settings: args.get::<AppSettings>()?,
            instanced: false,
            greeted: 0,
        })
    }

    fn set_instanced(&mut self, instanced: bool) {
        self.instanced = instanced;
    }

    fn is_instanced(&self) -> bool {
        self.instanced
    }
}

register_instance!(Greeter);

fn main() -> ExitCode {
    // 환경 설정 및 로깅 초기화
    init_logging();
    load_env_file();

    info!("🚀 실행 컨텍스트: {}", ExecutionContext::current().as_str());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {}", e);
            for message in e.messages() {
                eprintln!("  - {}", message);
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> AppResult<()> {
    let greeting = std::env::var("GREETING").unwrap_or_else(|_| "Hello".to_string());
    add_links(Links::new().with(Arc::new(AppSettings { greeting })));

    Container::global().initialize_all()?;

    let shared = Greeter::instance()?;
    info!(
        "✅ 싱글톤 Greeter (instanced = {}, settings = {:?})",
        shared.is_instanced(),
        shared.settings
    );

    let mut local = Greeter::new_instance()?;
    println!("{}", local.greet("world"));
    info!(
        "로컬 Greeter (instanced = {}, greeted = {})",
        local.is_instanced(),
        local.greeted
    );

    Ok(())
}

/// 로깅 시스템을 초기화합니다
///
/// 환경변수 `RUST_LOG`를 기반으로 로깅 레벨을 설정합니다. 기본값은 info 입니다.
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}
