///
/// @package filet-rs
///
/// @file Client registry functions
/// @copyright 2025-present Christoph Kappel <christoph@unexist.dev>
/// @version $Id$
///
/// This program can be distributed under the terms of the GNU GPLv3.
/// See the file LICENSE for details.
///

use std::collections::HashMap;
use std::fmt;
use log::debug;
use stdext::function_name;
use x11rb::protocol::xproto::Window;
use crate::client::Client;

/// Generation-checked handle of a [`Client`] inside the [`Registry`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ClientId {
    idx: u32,
    generation: u32,
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.idx, self.generation)
    }
}

#[derive(Default, Debug)]
struct Slot {
    generation: u32,
    client: Option<Client>,
}

/// Owns all managed clients, order is most-recent first
#[derive(Default, Debug)]
pub(crate) struct Registry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<ClientId>,
    handles: HashMap<Window, ClientId>,
}

impl Registry {
    /// Insert client at the head
    ///
    /// # Arguments
    ///
    /// * `client` - Client to take ownership of
    ///
    /// # Returns
    ///
    /// [`ClientId`] of the new client or [`None`] when the window is already managed
    pub(crate) fn attach(&mut self, client: Client) -> Option<ClientId> {
        if self.handles.contains_key(&client.win) {
            return None;
        }

        let win = client.win;

        let id = if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];

            slot.client = Some(client);

            ClientId { idx, generation: slot.generation }
        } else {
            self.slots.push(Slot { generation: 0, client: Some(client) });

            ClientId { idx: (self.slots.len() - 1) as u32, generation: 0 }
        };

        self.order.insert(0, id);
        self.handles.insert(win, id);

        debug!("{}: id={}, win={}", function_name!(), id, win);

        Some(id)
    }

    /// Remove client and keep the relative order of all others
    ///
    /// # Arguments
    ///
    /// * `id` - Client to remove
    ///
    /// # Returns
    ///
    /// Removed [`Client`] or [`None`] when the id is stale
    pub(crate) fn detach(&mut self, id: ClientId) -> Option<Client> {
        let slot = self.slots.get_mut(id.idx as usize)?;

        if slot.generation != id.generation {
            return None;
        }

        let client = slot.client.take()?;

        slot.generation = slot.generation.wrapping_add(1);

        self.free.push(id.idx);
        self.order.retain(|other| *other != id);
        self.handles.remove(&client.win);

        debug!("{}: id={}, win={}", function_name!(), id, client.win);

        Some(client)
    }

    /// Move client to the head of the order
    pub(crate) fn move_to_head(&mut self, id: ClientId) -> bool {
        match self.order.iter().position(|other| *other == id) {
            Some(pos) => {
                self.order.remove(pos);
                self.order.insert(0, id);

                true
            }
            None => false,
        }
    }

    pub(crate) fn find_by_handle(&self, win: Window) -> Option<ClientId> {
        self.handles.get(&win).copied()
    }

    pub(crate) fn contains(&self, id: ClientId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get(&self, id: ClientId) -> Option<&Client> {
        self.slots.get(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.client.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.slots.get_mut(id.idx as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.client.as_mut())
    }

    /// Ids in registry order, most-recent first
    pub(crate) fn ids(&self) -> &[ClientId] {
        &self.order
    }

    /// Clients in registry order, most-recent first
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = (ClientId, &Client)> {
        self.order.iter()
            .filter_map(|id| self.get(*id).map(|client| (*id, client)))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
