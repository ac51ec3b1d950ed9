// src/gui/progress.rs
use std::sync::{ Arc, Mutex };
use crate::progress::Progress;

pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    done: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, done: 0, total: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        let text = msg.into();
        if let Ok(mut s) = self.status.lock() {
            *s = text;
        }
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn item_done(&mut self, _index: usize) {
        self.done += 1;
        if self.done % 100 == 0 || self.done == self.total {
            self.set_status(format!("Writing devices ({}/{})", self.done, self.total));
        }
    }
    fn finish(&mut self) {
        if self.total == 0 {
            self.set_status(s!("Done"));
        } else {
            self.set_status(format!("Done ({}/{})", self.done, self.total));
        }
    }
}
