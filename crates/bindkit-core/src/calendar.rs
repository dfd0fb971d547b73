#![forbid(unsafe_code)]

//! Calendar with an optional delegate and an optional data source.
//!
//! Both collaborators are optional capability objects. When one is absent
//! the calendar falls back to a fixed policy:
//!
//! | Question                  | No delegate / data source |
//! |---------------------------|---------------------------|
//! | may the year change?      | yes                       |
//! | events on a given date    | none                      |
//!
//! Every trait method has a default body, so an implementor only overrides
//! what it cares about.

use std::fmt;
use std::rc::Rc;

use time::{Date, OffsetDateTime};
use tracing::debug;

/// Receives calendar events and decides whether the year may change.
pub trait CalendarDelegate {
    /// Called after the year has been approved and right before it is shown.
    fn will_display_year(&self, _calendar: &Calendar, _year: i32) {}

    /// Called after the selected date changed.
    fn did_select(&self, _calendar: &Calendar, _date: Date) {}

    /// Whether the calendar may move to another year.
    fn should_change_year(&self, _calendar: &Calendar) -> bool {
        true
    }
}

/// Supplies the events shown for a date.
pub trait CalendarDataSource {
    /// Titles of the events on `date`.
    fn events_on(&self, _calendar: &Calendar, _date: Date) -> Vec<String> {
        Vec::new()
    }
}

/// A calendar that consults optional collaborators.
pub struct Calendar {
    selected_date: Date,
    current_year: i32,
    delegate: Option<Rc<dyn CalendarDelegate>>,
    data_source: Option<Rc<dyn CalendarDataSource>>,
}

impl fmt::Debug for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calendar")
            .field("selected_date", &self.selected_date)
            .field("current_year", &self.current_year)
            .field("has_delegate", &self.delegate.is_some())
            .field("has_data_source", &self.data_source.is_some())
            .finish()
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::today()
    }
}

impl Calendar {
    /// Calendar positioned on `date`, showing its year.
    #[must_use]
    pub fn new(date: Date) -> Self {
        Self {
            selected_date: date,
            current_year: date.year(),
            delegate: None,
            data_source: None,
        }
    }

    /// Calendar positioned on today's UTC date.
    #[must_use]
    pub fn today() -> Self {
        Self::new(OffsetDateTime::now_utc().date())
    }

    /// Attach a delegate.
    #[must_use]
    pub fn with_delegate(mut self, delegate: Rc<dyn CalendarDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Attach a data source.
    #[must_use]
    pub fn with_data_source(mut self, data_source: Rc<dyn CalendarDataSource>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    /// Replace or remove the delegate.
    pub fn set_delegate(&mut self, delegate: Option<Rc<dyn CalendarDelegate>>) {
        self.delegate = delegate;
    }

    /// Replace or remove the data source.
    pub fn set_data_source(&mut self, data_source: Option<Rc<dyn CalendarDataSource>>) {
        self.data_source = data_source;
    }

    #[must_use]
    pub fn selected_date(&self) -> Date {
        self.selected_date
    }

    #[must_use]
    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Select `date` and tell the delegate.
    pub fn select_date(&mut self, date: Date) {
        self.selected_date = date;
        debug!(%date, "calendar date selected");
        if let Some(delegate) = self.delegate.clone() {
            delegate.did_select(self, date);
        }
    }

    /// Move to `year` if the delegate allows it (always, without a delegate).
    ///
    /// The delegate hears `will_display_year` before the year is stored.
    /// Returns whether the year changed.
    pub fn change_year(&mut self, year: i32) -> bool {
        let Some(delegate) = self.delegate.clone() else {
            self.current_year = year;
            return true;
        };
        if !delegate.should_change_year(self) {
            debug!(year, "calendar year change vetoed");
            return false;
        }
        delegate.will_display_year(self, year);
        self.current_year = year;
        true
    }

    /// Events on `date`, or none without a data source.
    #[must_use]
    pub fn events_on(&self, date: Date) -> Vec<String> {
        match &self.data_source {
            Some(source) => source.events_on(self, date),
            None => Vec::new(),
        }
    }
}
