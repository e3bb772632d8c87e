//! 에러 코드 상수 정의
//!
//! 프론트엔드에서 i18n 처리를 위해 에러 코드를 문자열로 반환합니다.

/// 디렉토리 목록 조회 실패
pub const ERR_LISTING_FAILED: &str = "ERR_LISTING_FAILED";

/// 디렉토리가 아닌 경로
pub const ERR_NOT_A_DIRECTORY: &str = "ERR_NOT_A_DIRECTORY";

/// Location에 경로가 없음
pub const ERR_LOCATION_WITHOUT_PATH: &str = "ERR_LOCATION_WITHOUT_PATH";

/// 설정 파일 읽기/파싱 실패
pub const ERR_CONFIG_LOAD_FAILED: &str = "ERR_CONFIG_LOAD_FAILED";

/// Location 저장소 읽기 실패
pub const ERR_STORE_LOAD_FAILED: &str = "ERR_STORE_LOAD_FAILED";

/// Location 저장소 쓰기 실패
pub const ERR_STORE_SAVE_FAILED: &str = "ERR_STORE_SAVE_FAILED";
