//! 문자열 처리 유틸리티
//!
//! 로그와 터미널 출력에 사용할 타입 이름 정리 함수를 제공합니다.

/// 전체 모듈 경로를 포함한 타입 이름에서 마지막 경로 구간만 추출합니다.
///
/// `std::any::type_name::<T>()`은 `my_app::services::Mailer`처럼 전체 경로를
/// 반환하므로, 출력용으로 `Mailer`만 남깁니다. 제네릭 인자 안의 경로는
/// 건드리지 않습니다.
///
/// # Examples
///
/// ```rust
/// use instance_registry::utils::string_utils::short_type_name;
///
/// assert_eq!(short_type_name("my_app::services::Mailer"), "Mailer");
/// assert_eq!(short_type_name("Mailer"), "Mailer");
/// assert_eq!(
///     short_type_name("alloc::vec::Vec<alloc::string::String>"),
///     "Vec<alloc::string::String>"
/// );
/// ```
pub fn short_type_name(type_name: &str) -> &str {
    let base_end = type_name.find('<').unwrap_or(type_name.len());

    match type_name[..base_end].rfind("::") {
        Some(pos) => &type_name[pos + 2..],
        None => type_name,
    }
}
