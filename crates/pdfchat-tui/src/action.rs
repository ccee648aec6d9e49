/// Everything a key press, mouse event or timer can ask the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Ask for quit confirmation.
    Quit,
    /// Leave immediately, skipping confirmation.
    ForceQuit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    DrillIn,
    NavigateBack,
    Confirm,
    NewChat,
    DeleteChat,
    OpenFilePicker,
    FocusQuestion,
    ToggleHelp,

    // Text input mode
    TextInput(char),
    Backspace,
    DeleteForward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    Submit,
    CancelInput,

    Resize(u16, u16),
    Tick,
    None,
}
