//! Chart settings and the provider that publishes changes to them

use serde::{Deserialize, Serialize};

use crate::events::{EventBus, ListenerId, SettingsEvent};

/// Default granularity in minutes
pub const DEFAULT_TIME_INTERVAL: u32 = 15;
/// Smallest accepted granularity
pub const MIN_TIME_INTERVAL: u32 = 1;
/// Largest accepted granularity (half a day)
pub const MAX_TIME_INTERVAL: u32 = 720;

/// Granularity choices offered by the settings panel
pub const TIME_INTERVAL_CHOICES: &[u32] = &[5, 10, 15, 30, 60];

fn default_time_interval() -> u32 {
    DEFAULT_TIME_INTERVAL
}

fn default_show_empty_time() -> bool {
    true
}

/// Settings the radial chart renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Minute resolution of empty-time inference and drag rounding
    #[serde(default = "default_time_interval")]
    pub time_interval: u32,
    /// Draw empty intervals as outlined arcs
    #[serde(default = "default_show_empty_time")]
    pub show_empty_time: bool,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            time_interval: DEFAULT_TIME_INTERVAL,
            show_empty_time: true,
        }
    }
}

impl ChartSettings {
    /// Copy with `time_interval` forced into the accepted range
    pub fn clamped(self) -> Self {
        Self {
            time_interval: self.time_interval.clamp(MIN_TIME_INTERVAL, MAX_TIME_INTERVAL),
            ..self
        }
    }
}

/// External collaborator the chart reads settings from
pub trait SettingsProvider {
    fn settings(&self) -> ChartSettings;

    /// Listen for [`SettingsEvent::Changed`]
    fn subscribe(&mut self, listener: Box<dyn FnMut(&SettingsEvent)>) -> ListenerId;
}

/// In-process settings holder
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: ChartSettings,
    bus: EventBus<SettingsEvent>,
}

impl SettingsStore {
    pub fn new(settings: ChartSettings) -> Self {
        Self {
            settings: settings.clamped(),
            bus: EventBus::new(),
        }
    }

    /// Replace the settings and notify listeners if anything changed
    pub fn update(&mut self, settings: ChartSettings) {
        let settings = settings.clamped();
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        log::info!(
            "Chart settings changed: interval {} min, show empty {}",
            settings.time_interval,
            settings.show_empty_time
        );
        self.bus.emit(&SettingsEvent::Changed { settings });
    }
}

impl SettingsProvider for SettingsStore {
    fn settings(&self) -> ChartSettings {
        self.settings
    }

    fn subscribe(&mut self, listener: Box<dyn FnMut(&SettingsEvent)>) -> ListenerId {
        self.bus.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_defaults() {
        let settings = ChartSettings::default();
        assert_eq!(settings.time_interval, 15);
        assert!(settings.show_empty_time);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: ChartSettings = toml::from_str("show_empty_time = false").unwrap();
        assert_eq!(settings.time_interval, 15);
        assert!(!settings.show_empty_time);
    }

    #[test]
    fn test_interval_is_clamped() {
        let zero = ChartSettings {
            time_interval: 0,
            show_empty_time: true,
        };
        assert_eq!(zero.clamped().time_interval, 1);

        let huge = ChartSettings {
            time_interval: 5000,
            show_empty_time: true,
        };
        assert_eq!(huge.clamped().time_interval, 720);
    }

    #[test]
    fn test_update_notifies_only_on_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = SettingsStore::new(ChartSettings::default());
        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |event: &SettingsEvent| sink.borrow_mut().push(event.clone())));

        store.update(ChartSettings::default());
        let changed = ChartSettings {
            time_interval: 30,
            show_empty_time: false,
        };
        store.update(changed);

        assert_eq!(*seen.borrow(), vec![SettingsEvent::Changed { settings: changed }]);
        assert_eq!(store.settings(), changed);
    }
}
