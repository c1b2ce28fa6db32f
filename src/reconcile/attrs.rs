//! Attribute, property and event-handler synchronization.
//!
//! The live attribute set of an element is its host attributes plus the
//! `on*` keys of handlers recorded in the registry. Keys missing from the
//! target are removed; every target key is then applied.

use tracing::{trace, warn};

use crate::attr::{event_name, AttrValue, Attrs, AttrsExt, EVENT_PREFIX};
use crate::event::EventHandler;
use crate::host::{Host, PropValue};

use super::Reconciler;

/// Controls whose live value is edited by the user with a text cursor.
fn is_text_input(tag: &str) -> bool {
    matches!(tag, "input" | "textarea")
}

impl<H: Host> Reconciler<H> {
    pub(super) fn update_attributes(
        &mut self,
        host: &mut H,
        live: &H::Node,
        attrs: &Attrs,
    ) -> Result<(), H::Error> {
        for key in self.list_attributes(host, live) {
            if !attrs.has_attr(&key) {
                self.remove_attribute(host, live, &key)?;
            }
        }

        for (key, value) in attrs {
            self.set_attribute(host, live, key, value)?;
        }
        Ok(())
    }

    /// Host attributes plus handler keys recorded for this element.
    fn list_attributes(&self, host: &H, live: &H::Node) -> Vec<String> {
        let mut keys: Vec<String> = host
            .attribute_names(live)
            .into_iter()
            .map(String::from)
            .collect();
        keys.extend(
            self.registry
                .events(live)
                .into_iter()
                .map(|event| format!("{EVENT_PREFIX}{event}")),
        );
        keys
    }

    fn set_attribute(
        &mut self,
        host: &mut H,
        live: &H::Node,
        key: &str,
        value: &AttrValue,
    ) -> Result<(), H::Error> {
        if let Some(event) = event_name(key) {
            return match value {
                AttrValue::Handler(handler) => self.attach_handler(host, live, event, handler),
                _ => self.detach_handler(host, live, event),
            };
        }

        if value.is_null() {
            return self.remove_attribute(host, live, key);
        }

        let Some(text) = value.to_attr_string() else {
            warn!(key, "handler given for a non-event attribute, ignoring");
            return Ok(());
        };

        if key == "style" {
            // Inline style is replaced wholesale, never merged
            host.set_style_text(live, &text)?;
        } else if host.has_property(live, key) {
            let tag = host.local_name(live).unwrap_or_default();
            let same_value = || host.get_property(live, key).as_deref() == Some(text.as_str());

            if is_text_input(&tag)
                && key == "value"
                && host.active_element().as_ref() == Some(live)
                && same_value()
            {
                // Re-assigning an equal value moves the cursor in some hosts
                trace!(?live, "skipping redundant value on focused input");
                return Ok(());
            } else if tag == "input" && key == "type" {
                host.set_attribute(live, key, &text)?;
            } else if matches!(tag.as_str(), "select" | "option") && key == "value" && same_value()
            {
                return Ok(());
            } else {
                let prop = match value {
                    AttrValue::Bool(b) => PropValue::Bool(*b),
                    _ => PropValue::Str(text),
                };
                host.set_property(live, key, prop)?;
            }
        } else if let AttrValue::Bool(flag) = value {
            if *flag {
                host.set_attribute(live, key, "")?;
            } else {
                host.remove_attribute(live, key)?;
            }
        } else {
            host.set_attribute(live, key, &text)?;
        }

        self.stats.attrs_set += 1;
        Ok(())
    }

    fn remove_attribute(&mut self, host: &mut H, live: &H::Node, key: &str) -> Result<(), H::Error> {
        if let Some(event) = event_name(key) {
            return self.detach_handler(host, live, event);
        }

        if key == "style" {
            host.set_style_text(live, "")?;
        } else if host.has_property(live, key) && !Self::attribute_only(host, live, key) {
            host.set_property(live, key, PropValue::Null)?;
        } else {
            host.remove_attribute(live, key)?;
        }

        self.stats.attrs_removed += 1;
        Ok(())
    }

    /// Properties that must be cleared through the attribute instead.
    fn attribute_only(host: &H, live: &H::Node, key: &str) -> bool {
        let tag = host.local_name(live).unwrap_or_default();
        (matches!(tag.as_str(), "option" | "select") && key == "value")
            || (tag == "input" && key == "type")
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event handlers
    // ─────────────────────────────────────────────────────────────────────────

    fn attach_handler(
        &mut self,
        host: &mut H,
        live: &H::Node,
        event: &str,
        handler: &EventHandler,
    ) -> Result<(), H::Error> {
        self.detach_handler(host, live, event)?;

        host.add_event_listener(live, event, handler)?;
        self.registry.insert(live.clone(), event, handler.clone());
        self.stats.handlers_attached += 1;
        Ok(())
    }

    fn detach_handler(&mut self, host: &mut H, live: &H::Node, event: &str) -> Result<(), H::Error> {
        let Some(previous) = self.registry.get(live, event).cloned() else {
            return Ok(());
        };

        host.remove_event_listener(live, event, &previous)?;
        self.registry.remove(live, event);
        self.stats.handlers_detached += 1;
        Ok(())
    }
}
