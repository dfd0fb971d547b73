#![forbid(unsafe_code)]

//! Demo wiring: a user record bound to a text field, plus a calendar with a
//! reminders delegate and data source.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use bindkit_core::{
    Calendar, CalendarDataSource, CalendarDelegate, ObservableValue, TextBinding, bind_text,
};
use bindkit_runtime::Scheduler;
use bindkit_widgets::TextField;
use time::Date;
use tracing::info;

use crate::cli::Opts;

/// Domain record owning its observable name.
#[derive(Debug)]
pub struct User {
    pub name: ObservableValue<String>,
}

impl User {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: ObservableValue::new(name.into()),
        }
    }
}

/// Calendar delegate keeping a title in sync with the displayed year.
#[derive(Debug, Default)]
pub struct Reminders {
    title: RefCell<String>,
    selected: RefCell<Vec<Date>>,
}

impl Reminders {
    #[must_use]
    pub fn for_year(year: i32) -> Self {
        Self {
            title: RefCell::new(format!("Year: {year}")),
            selected: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }

    /// Dates the user picked, oldest first.
    #[must_use]
    pub fn selected(&self) -> Vec<Date> {
        self.selected.borrow().clone()
    }
}

impl CalendarDelegate for Reminders {
    fn will_display_year(&self, _calendar: &Calendar, year: i32) {
        *self.title.borrow_mut() = format!("Year: {year}");
    }

    fn did_select(&self, _calendar: &Calendar, date: Date) {
        info!(%date, "reminder date selected");
        self.selected.borrow_mut().push(date);
    }
}

/// In-memory event titles per date.
#[derive(Debug, Default)]
pub struct ReminderBook {
    events: BTreeMap<Date, Vec<String>>,
}

impl ReminderBook {
    #[must_use]
    pub fn with_event(mut self, date: Date, title: impl Into<String>) -> Self {
        self.events.entry(date).or_default().push(title.into());
        self
    }
}

impl CalendarDataSource for ReminderBook {
    fn events_on(&self, _calendar: &Calendar, date: Date) -> Vec<String> {
        self.events.get(&date).cloned().unwrap_or_default()
    }
}

/// Everything the demo screen owns.
pub struct DemoApp {
    pub user: User,
    pub field: Rc<RefCell<TextField>>,
    pub binding: TextBinding,
    pub calendar: Calendar,
    pub reminders: Rc<Reminders>,
    width: usize,
}

impl DemoApp {
    /// Build the screen and bind the name field.
    #[must_use]
    pub fn new(opts: &Opts, calendar_date: Date) -> Self {
        let user = User::new(opts.name.clone());
        let field = Rc::new(RefCell::new(TextField::new().with_placeholder("name")));
        let binding = bind_text(&field, &user.name);

        let reminders = Rc::new(Reminders::for_year(calendar_date.year()));
        let book = ReminderBook::default().with_event(calendar_date, "Demo day");
        let calendar = Calendar::new(calendar_date)
            .with_delegate(reminders.clone())
            .with_data_source(Rc::new(book));

        Self {
            user,
            field,
            binding,
            calendar,
            reminders,
            width: opts.width,
        }
    }

    /// Queue the external rename on `scheduler`.
    ///
    /// The callback holds only a weak handle, so a torn-down screen ignores it.
    pub fn schedule_rename(&self, scheduler: &dyn Scheduler, delay: Duration, rename: String) {
        let name = self.user.name.downgrade();
        scheduler.after(
            delay,
            Box::new(move || {
                if let Some(name) = name.upgrade() {
                    info!(new_name = %rename, "external rename");
                    name.set(rename);
                }
            }),
        );
    }

    /// The field as it would be drawn, between brackets.
    #[must_use]
    pub fn render_field(&self) -> String {
        format!("[{}]", self.field.borrow().render_line(self.width))
    }

    /// One-line summary of the calendar state.
    #[must_use]
    pub fn render_calendar(&self) -> String {
        let date = self.calendar.selected_date();
        let events = self.calendar.events_on(date);
        let events = if events.is_empty() {
            "no events".to_string()
        } else {
            events.join(", ")
        };
        format!("{} | {date}: {events}", self.reminders.title())
    }
}
