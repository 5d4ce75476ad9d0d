use std::collections::HashSet;

use parking_lot::Mutex;
use talkable_core::types::{Identity, Properties};

use crate::host::HostContext;

/// Host double with settable user/path and a record of script loads.
#[derive(Default)]
pub struct FakeHost {
    user: Mutex<Identity>,
    path: Mutex<String>,
    globals: Mutex<HashSet<String>>,
    scripts: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn at(path: &str) -> Self {
        let host = Self::default();
        host.set_path(path);
        host
    }

    pub fn set_path(&self, path: &str) {
        *self.path.lock() = path.to_string();
    }

    pub fn set_user(&self, user_id: Option<&str>, traits: serde_json::Value) {
        let traits: Properties = traits.as_object().cloned().unwrap_or_default();
        *self.user.lock() = Identity::new(user_id.map(str::to_string), traits);
    }

    pub fn define_global(&self, name: &str) {
        self.globals.lock().insert(name.to_string());
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }
}

impl HostContext for FakeHost {
    fn user(&self) -> Identity {
        self.user.lock().clone()
    }

    fn page_path(&self) -> String {
        self.path.lock().clone()
    }

    fn load_script(&self, src: &str) {
        self.scripts.lock().push(src.to_string());
    }

    fn global_defined(&self, name: &str) -> bool {
        self.globals.lock().contains(name)
    }
}
