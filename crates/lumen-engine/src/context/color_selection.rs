use std::fmt;

use crate::paint::{Hsva, Rgba};

use super::reentrancy::ReentrancyFlag;

type Listener = Box<dyn FnMut(&mut ColorSelection)>;

/// The colour currently picked, with the previous pick and an HSVA view
/// that keeps its hue through greys.
///
/// Listeners run after every change and may set the colour again; such
/// nested changes are ignored so a cascade always terminates.
pub struct ColorSelection {
    current: Rgba,
    last: Rgba,
    hsva: Hsva,
    listeners: Vec<Listener>,
    updating: ReentrancyFlag,
}

impl Default for ColorSelection {
    fn default() -> Self {
        Self::new(Rgba::WHITE)
    }
}

impl fmt::Debug for ColorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorSelection")
            .field("current", &self.current)
            .field("last", &self.last)
            .field("hsva", &self.hsva)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ColorSelection {
    pub fn new(initial: Rgba) -> Self {
        Self {
            current: initial,
            last: initial,
            hsva: Hsva::from_rgba(initial),
            listeners: Vec::new(),
            updating: ReentrancyFlag::new(),
        }
    }

    #[inline]
    pub fn current(&self) -> Rgba {
        self.current
    }

    #[inline]
    pub fn last(&self) -> Rgba {
        self.last
    }

    #[inline]
    pub fn hsva(&self) -> Hsva {
        self.hsva
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when translucent.
    pub fn html(&self) -> String {
        self.current.to_html()
    }

    pub fn set_color(&mut self, color: Rgba) {
        let hsva = Hsva::from_rgba_with_hue(color, self.hsva.h);
        self.apply(color, hsva);
    }

    /// Sets from HSVA exactly as given, hue included.
    pub fn set_hsva(&mut self, hsva: Hsva) {
        self.apply(hsva.to_rgba(), hsva);
    }

    /// Parses an HTML colour code; invalid input is logged and ignored.
    pub fn set_html(&mut self, code: &str) {
        match Rgba::from_html(code) {
            Ok(color) => self.set_color(color),
            Err(e) => log::warn!("colour selection unchanged: {e}"),
        }
    }

    /// Called with the selection after every change.
    pub fn on_change(&mut self, listener: impl FnMut(&mut ColorSelection) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn apply(&mut self, color: Rgba, hsva: Hsva) {
        let Some(_guard) = self.updating.enter() else {
            log::trace!("nested colour change ignored");
            return;
        };

        self.last = self.current;
        self.current = color;
        self.hsva = hsva;

        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener(self);
        }
        // keep listeners registered during the cascade
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    // ── values ────────────────────────────────────────────────────────────

    #[test]
    fn tracks_current_and_last() {
        let mut sel = ColorSelection::new(Rgba::BLACK);
        sel.set_color(Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(sel.current(), Rgba::rgb(1.0, 0.0, 0.0));
        assert_eq!(sel.last(), Rgba::BLACK);
        assert_eq!(sel.html(), "#FF0000");
    }

    #[test]
    fn hue_survives_grey() {
        let mut sel = ColorSelection::default();
        sel.set_color(Rgba::rgb(0.0, 0.0, 1.0));
        let hue = sel.hsva().h;
        sel.set_color(Rgba::rgb(0.5, 0.5, 0.5));
        assert_eq!(sel.hsva().h, hue);
        sel.set_color(Rgba::BLACK);
        assert_eq!(sel.hsva().h, hue);
    }

    #[test]
    fn invalid_html_is_ignored() {
        let mut sel = ColorSelection::new(Rgba::BLACK);
        sel.set_html("#12345");
        sel.set_html("tomato");
        assert_eq!(sel.current(), Rgba::BLACK);
        sel.set_html("#00FF00");
        assert_eq!(sel.current(), Rgba::rgb(0.0, 1.0, 0.0));
    }

    // ── listeners ─────────────────────────────────────────────────────────

    #[test]
    fn listeners_see_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let mut sel = ColorSelection::default();
        sel.on_change(move |s| log.borrow_mut().push(s.current()));
        sel.set_color(Rgba::BLACK);
        sel.set_hsva(Hsva::new(0.0, 1.0, 1.0, 1.0));
        assert_eq!(*seen.borrow(), [Rgba::BLACK, Rgba::rgb(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn cascading_updates_terminate() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut sel = ColorSelection::default();
        // a listener that echoes the change back would loop forever
        sel.on_change(move |s| {
            *counter.borrow_mut() += 1;
            s.set_color(Rgba::BLACK);
        });
        sel.set_color(Rgba::rgb(0.0, 0.0, 1.0));
        assert_eq!(*calls.borrow(), 1);
        assert_eq!(sel.current(), Rgba::rgb(0.0, 0.0, 1.0));

        // the flag is released afterwards
        sel.set_color(Rgba::rgb(0.0, 1.0, 0.0));
        assert_eq!(*calls.borrow(), 2);
    }

    #[test]
    fn listener_added_during_cascade_is_kept() {
        let mut sel = ColorSelection::default();
        let added = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&added);
        sel.on_change(move |s| {
            if !*flag.borrow() {
                *flag.borrow_mut() = true;
                s.on_change(|_| {});
            }
        });
        sel.set_color(Rgba::BLACK);
        assert_eq!(sel.listeners.len(), 2);
    }
}
