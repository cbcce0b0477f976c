//! Scripted failures of the mocked server

use crate::error::ApiError;

/// The requests of the mocked server whose outcome can be scripted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    GetUserTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
    Login,
    Register,
    UpdateProfile,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::GetUserTasks, Operation::CreateTask, Operation::UpdateTask, Operation::DeleteTask,
        Operation::Login, Operation::Register, Operation::UpdateProfile,
    ];
}

/// How the mocked server answers, per operation.
///
/// Each operation has a `(successes, failures)` script: the next `successes` calls go through,
/// the `failures` calls after them fail with a 500, and every later call goes through again.
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// While set, no script is consumed and every call goes through
    pub is_suspended: bool,

    pub get_user_tasks: (u32, u32),
    pub create_task: (u32, u32),
    pub update_task: (u32, u32),
    pub delete_task: (u32, u32),
    pub login: (u32, u32),
    pub register: (u32, u32),
    pub update_profile: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `n_fails` calls of every operation fail
    pub fn fail_now(n_fails: u32) -> Self {
        let mut behaviour = Self::new();
        for op in Operation::ALL.iter() {
            *behaviour.script_mut(*op) = (0, n_fails);
        }
        behaviour
    }

    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }

    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    fn script_mut(&mut self, op: Operation) -> &mut (u32, u32) {
        match op {
            Operation::GetUserTasks => &mut self.get_user_tasks,
            Operation::CreateTask => &mut self.create_task,
            Operation::UpdateTask => &mut self.update_task,
            Operation::DeleteTask => &mut self.delete_task,
            Operation::Login => &mut self.login,
            Operation::Register => &mut self.register,
            Operation::UpdateProfile => &mut self.update_profile,
        }
    }

    /// Play the next step of the script of an operation
    pub fn check(&mut self, op: Operation) -> Result<(), ApiError> {
        if self.is_suspended {
            return Ok(());
        }

        let script = self.script_mut(op);
        match *script {
            (0, 0) => Ok(()),
            (0, failures) => {
                script.1 = failures - 1;
                log::debug!("Mock behaviour: {:?} fails ({} more failure(s) scripted)", op, script.1);
                Err(ApiError::Status {
                    status: 500,
                    body: Some(serde_json::json!({
                        "message": format!("Scripted failure of {:?}", op),
                    })),
                })
            },
            (successes, _) => {
                script.0 = successes - 1;
                Ok(())
            },
        }
    }
}
