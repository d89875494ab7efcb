//! 공통 유틸리티 함수 모듈
//!
//! - [`string_utils`] - 타입 이름 정리
//! - [`display_terminal`] - 터미널 출력 포맷팅 함수들

pub mod string_utils;
pub mod display_terminal;
