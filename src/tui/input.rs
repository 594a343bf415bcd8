use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Drag(Direction),
    Activate,
    SwitchPanel,
    ZoomIn,
    ZoomOut,
    ResetView,
    NextNode,
    PrevNode,
    ExamPoint,
    Quit,
    ToggleHelp,
    ToggleMode,
    TogglePlay,
    ResetTeaching,
    ToggleQuiz,
    StartSearch,
    ToggleSidebar,
    FoldAll,
    OpenSettings,
    SubmitText,
    Cancel,
    Backspace,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    if text_mode {
        return match key.code {
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Left => Action::Move(Direction::Left),
            KeyCode::Right => Action::Move(Direction::Right),
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        };
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Up if shift => Action::Drag(Direction::Up),
        KeyCode::Down if shift => Action::Drag(Direction::Down),
        KeyCode::Left if shift => Action::Drag(Direction::Left),
        KeyCode::Right if shift => Action::Drag(Direction::Right),
        KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Enter => Action::Activate,
        KeyCode::Tab => Action::SwitchPanel,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::Cancel,
        KeyCode::Char('+') => Action::ZoomIn,
        KeyCode::Char('=') if shift => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('0') => Action::ResetView,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Char('H') => Action::Drag(Direction::Left),
        KeyCode::Char('J') => Action::Drag(Direction::Down),
        KeyCode::Char('K') => Action::Drag(Direction::Up),
        KeyCode::Char('L') => Action::Drag(Direction::Right),
        KeyCode::Char('m') => Action::ToggleMode,
        KeyCode::Char(' ') | KeyCode::Char('p') => Action::TogglePlay,
        KeyCode::Char('r') => Action::ResetTeaching,
        KeyCode::Char('x') => Action::ToggleQuiz,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('b') => Action::ToggleSidebar,
        KeyCode::Char('z') => Action::FoldAll,
        KeyCode::Char('s') => Action::OpenSettings,
        KeyCode::Char('n') => Action::NextNode,
        KeyCode::Char('N') => Action::PrevNode,
        KeyCode::Char('e') => Action::ExamPoint,
        _ => Action::Noop,
    }
}
