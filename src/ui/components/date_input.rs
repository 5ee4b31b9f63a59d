use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn width(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            DatePart::Year => "[YYYY]",
            DatePart::Month => "[MM]",
            DatePart::Day => "[DD]",
        }
    }
}

/// Keyboard entry for a calendar date, one part at a time
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub buffer: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Year,
            buffer: String::new(),
        }
    }

    pub fn start_editing(&mut self) {
        self.editing = true;
        self.date_part = DatePart::Year;
        self.buffer.clear();
    }

    pub fn stop_editing(&mut self) {
        self.editing = false;
        self.buffer.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Month,
            DatePart::Month => DatePart::Day,
            DatePart::Day => DatePart::Year,
        };
        self.buffer.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Year => DatePart::Day,
            DatePart::Month => DatePart::Year,
            DatePart::Day => DatePart::Month,
        };
        self.buffer.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.buffer.push(c);
                if self.buffer.len() == self.date_part.width() {
                    self.commit_part();
                    self.next_date_part();
                }
            }
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    // Invalid dates (e.g. Feb 30) leave the previous value in place
    fn commit_part(&mut self) {
        let Ok(value) = self.buffer.parse::<u32>() else {
            return;
        };
        let updated = match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => self.date.with_year(value as i32),
            DatePart::Month => self.date.with_month(value),
            DatePart::Day => self.date.with_day(value),
            _ => None,
        };
        if let Some(date) = updated {
            self.date = date;
        }
    }

    pub fn get_display_string(&self) -> String {
        let year = format!("{:04}", self.date.year());
        let month = format!("{:02}", self.date.month());
        let day = format!("{:02}", self.date.day());

        if !self.editing {
            return format!("{year}-{month}-{day}");
        }

        let cursor = if self.buffer.is_empty() {
            self.date_part.placeholder().to_string()
        } else {
            format!("[{}]", self.buffer)
        };

        match self.date_part {
            DatePart::Year => format!("{year}{cursor}-{month}-{day}"),
            DatePart::Month => format!("{year}-{month}{cursor}-{day}"),
            DatePart::Day => format!("{year}-{month}-{day}{cursor}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn entering_every_part_sets_the_date() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        state.start_editing();

        typed(&mut state, "20230715");

        assert_eq!(state.date, NaiveDate::from_ymd_opt(2023, 7, 15).unwrap());
        assert_eq!(state.date_part, DatePart::Year);
    }

    #[test]
    fn impossible_day_is_ignored() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(2023, 2, 10).unwrap());
        state.start_editing();
        state.handle_input(KeyCode::Right);
        state.handle_input(KeyCode::Right);

        typed(&mut state, "30");

        assert_eq!(state.date, NaiveDate::from_ymd_opt(2023, 2, 10).unwrap());
    }

    #[test]
    fn display_marks_the_part_being_edited() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(state.get_display_string(), "2024-03-09");

        state.start_editing();
        state.handle_input(KeyCode::Right);
        assert_eq!(state.get_display_string(), "2024-03[MM]-09");

        state.handle_input(KeyCode::Char('1'));
        assert_eq!(state.get_display_string(), "2024-03[1]-09");
    }

    #[test]
    fn keys_are_ignored_when_not_editing() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        typed(&mut state, "1999");
        assert_eq!(state.date.year(), 2024);
    }
}
