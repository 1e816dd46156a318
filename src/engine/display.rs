/// `m:ss` under an hour, `h:mm:ss` from there on. Negative input shows as zero.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hrs > 0 {
        format!("{}:{:02}:{:02}", hrs, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
