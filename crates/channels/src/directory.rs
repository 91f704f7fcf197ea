use crate::{ChannelRef, UserRef};

/// Snapshot of the channels and users a transport knows about.
///
/// Channel order is preserved as listed by the service; "first channel"
/// means the first entry here.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    channels: Vec<ChannelRef>,
    users: Vec<UserRef>,
}

impl Directory {
    pub fn new(channels: Vec<ChannelRef>, users: Vec<UserRef>) -> Self {
        Self { channels, users }
    }

    pub fn channels(&self) -> &[ChannelRef] {
        &self.channels
    }

    pub fn users(&self) -> &[UserRef] {
        &self.users
    }

    pub fn first_channel(&self) -> Option<&ChannelRef> {
        self.channels.first()
    }

    pub fn channel(&self, id: &str) -> Option<&ChannelRef> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&UserRef> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_by_name(&self, name: &str) -> Option<&UserRef> {
        self.users.iter().find(|u| u.name == name)
    }
}
