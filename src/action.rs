/// Central action enum: every user-driven state change flows through here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Lifecycle
    Quit,
    Tick,
    Refresh,
    Resize,

    // File list
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    SelectRow(usize),

    // Diff view
    ScrollUp,
    ScrollDown,
    HalfPageUp,
    HalfPageDown,
    ScrollTop,
    ScrollBottom,

    // Focus
    SwitchPane,
    FocusFileList,
    FocusDiff,

    ToggleHelp,
}
