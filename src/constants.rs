// UI Constants
pub const APP_TITLE: &str = "프리미어리그 실시간 AI 챗봇 : 프림이";
pub const APP_SUBTITLE: &str = "프리미어리그의 실시간 정보를 제공하는 AI 챗봇과 대화해보세요!";
pub const REFRESH_LABEL: &str = "실시간 데이터 가져오기";
pub const INPUT_PLACEHOLDER: &str = "메시지를 입력하세요...";
pub const TYPING_TEXT: &str = "프림이가 답변을 생각 중이에요!";
pub const REFRESHING_TEXT: &str = "데이터를 가져오는 중...";
pub const REFRESH_SUCCESS_NOTICE: &str = "데이터를 성공적으로 가져왔습니다.";
pub const SEND_FAILED_PREFIX: &str = "메시지 전송 실패";

/// Bubbles never take more than this share of the chat width.
pub const BUBBLE_WIDTH_PERCENT: u16 = 60;

// Identity Constants
pub const DEFAULT_USER_LABEL: &str = "나";
pub const DEFAULT_BOT_LABEL: &str = "프림이";
pub const DEFAULT_TIME_FORMAT: &str = "%p %-I:%M";
pub const TIME_LOCALE: chrono::Locale = chrono::Locale::ko_KR;

pub const WELCOME_TEXT: &str = "\"프리미어리그 실시간 정보\" 챗봇에 오신 것을 환영합니다!

다음과 같은 질문을 할 수 있습니다:

1. 특정 팀 또는 모든 팀의 순위, 승점, 골득실 등
2. 특정 팀의 최근 경기 결과
3. 특정 선수의 통계(득점, 도움 등)나 포지션
4. 리그 전체 기록 (예: 최다 득점자, 어시스트 순위)
5. 프리미어리그 득점왕, 우승팀 등 예측";

// Storage Constants
pub const MESSAGES_KEY: &str = "chatMessages";

// API Constants
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const INITIALIZE_PATH: &str = "/initialize";
pub const CHAT_PATH: &str = "/chat";
pub const DEFAULT_INITIALIZE_TIMEOUT_SECS: u64 = 600;
pub const INITIALIZE_SUCCESS_MESSAGE: &str = "Data initialized successfully";
