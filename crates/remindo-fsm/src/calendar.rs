// SPDX-FileCopyrightText: 2026 Remindo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Month-grid date picker rendered as an inline keyboard.

use chrono::{Datelike, NaiveDate};
use remindo_core::{Action, Button, Keyboard};

const MONTHS: [&str; 12] = [
    "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь", "Октябрь",
    "Ноябрь", "Декабрь",
];

const WEEKDAYS: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

/// The month before and after `(year, month)`.
pub fn neighbours(year: i32, month: u32) -> ((i32, u32), (i32, u32)) {
    let prev = if month == 1 { (year - 1, 12) } else { (year, month - 1) };
    let next = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    (prev, next)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let ((_, _), (ny, nm)) = neighbours(year, month);
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

fn filler() -> Button {
    Button::new(" ", Action::CalendarIgnore)
}

/// Keyboard for one month: title, weekday header, the day grid (weeks start
/// on Monday, blanks are inert), and previous/next navigation.
///
/// An out-of-range `month` falls back to `today`'s month.
pub fn month_keyboard(year: i32, month: u32, today: NaiveDate) -> Keyboard {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return month_keyboard(today.year(), today.month(), today);
    };

    let title = format!("{} {year}", MONTHS[(month - 1) as usize]);
    let mut keyboard = Keyboard::new()
        .row(vec![Button::new(title, Action::CalendarIgnore)])
        .row(
            WEEKDAYS
                .iter()
                .map(|d| Button::new(*d, Action::CalendarIgnore))
                .collect(),
        );

    let mut week: Vec<Button> = (0..first.weekday().num_days_from_monday())
        .map(|_| filler())
        .collect();
    for day in 1..=days_in_month(year, month) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };
        let label = if date == today {
            format!("[{day}]")
        } else {
            day.to_string()
        };
        week.push(Button::new(label, Action::CalendarDay(date)));
        if week.len() == 7 {
            keyboard = keyboard.row(std::mem::take(&mut week));
        }
    }
    if !week.is_empty() {
        week.resize_with(7, filler);
        keyboard = keyboard.row(week);
    }

    let ((py, pm), (ny, nm)) = neighbours(year, month);
    keyboard.row(vec![
        Button::new("<", Action::CalendarNav { year: py, month: pm }),
        Button::new(">", Action::CalendarNav { year: ny, month: nm }),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn every_day_of_the_month_is_pickable() {
        let kb = month_keyboard(2026, 2, date(2026, 2, 10));
        let days: Vec<_> = kb
            .buttons()
            .filter_map(|b| match b.action {
                Action::CalendarDay(d) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(days.len(), 28);
        assert_eq!(days.first(), Some(&date(2026, 2, 1)));
        assert_eq!(days.last(), Some(&date(2026, 2, 28)));
    }

    #[test]
    fn grid_rows_are_full_weeks() {
        let kb = month_keyboard(2026, 3, date(2026, 3, 1));
        // title, weekdays, weeks..., navigation
        let weeks = &kb.rows[2..kb.rows.len() - 1];
        assert!(weeks.iter().all(|w| w.len() == 7));
        // 2026-03-01 is a Sunday.
        assert_eq!(weeks[0][6].action, Action::CalendarDay(date(2026, 3, 1)));
    }

    #[test]
    fn navigation_wraps_years() {
        let kb = month_keyboard(2026, 12, date(2026, 12, 5));
        assert!(kb.contains(&Action::CalendarNav { year: 2027, month: 1 }));
        assert!(kb.contains(&Action::CalendarNav { year: 2026, month: 11 }));
        assert_eq!(neighbours(2026, 1).0, (2025, 12));
    }

    #[test]
    fn invalid_month_shows_current_one() {
        let today = date(2026, 5, 20);
        assert_eq!(month_keyboard(2026, 13, today), month_keyboard(2026, 5, today));
    }
}
