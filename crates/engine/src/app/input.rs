#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Left,
    Right,
    Up,
    Down,
    Quit,
}

const ACTION_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::Left => 0,
            InputAction::Right => 1,
            InputAction::Up => 2,
            InputAction::Down => 3,
            InputAction::Quit => 4,
        }
    }
}

/// Level state of the four arrow keys for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn cursor_keys(&self) -> CursorKeys {
        CursorKeys {
            left: self.is_down(InputAction::Left),
            right: self.is_down(InputAction::Right),
            up: self.is_down(InputAction::Up),
            down: self.is_down(InputAction::Down),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_keys_mirror_action_states() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::Left, true)
            .with_action_down(InputAction::Up, true);

        assert_eq!(
            snapshot.cursor_keys(),
            CursorKeys {
                left: true,
                right: false,
                up: true,
                down: false,
            }
        );
    }

    #[test]
    fn releasing_an_action_clears_it() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::Right, true)
            .with_action_down(InputAction::Right, false);
        assert!(!snapshot.is_down(InputAction::Right));
        assert!(!snapshot.quit_requested());
    }
}
