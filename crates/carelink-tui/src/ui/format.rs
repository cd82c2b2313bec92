use chrono::{DateTime, Local, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Clock time for today, short date otherwise.
pub fn message_time(at: Option<DateTime<Utc>>, today: chrono::NaiveDate) -> String {
    let Some(at) = at else {
        return String::new();
    };
    let local = at.with_timezone(&Local);
    if local.date_naive() == today {
        local.format("%H:%M").to_string()
    } else {
        local.format("%b %d").to_string()
    }
}

/// Cut `text` to at most `width` display columns, ending with an ellipsis when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

pub fn unread_badge(count: usize) -> String {
    match count {
        0 => String::new(),
        1..=99 => format!(" {} ", count),
        _ => " 99+ ".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_display_width() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 6), "hello…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_badge_caps_at_99() {
        assert_eq!(unread_badge(0), "");
        assert_eq!(unread_badge(3), " 3 ");
        assert_eq!(unread_badge(150), " 99+ ");
    }

    #[test]
    fn test_missing_time_is_blank() {
        assert_eq!(message_time(None, Local::now().date_naive()), "");
    }
}
