use bevy::prelude::*;

/// 面向终端用户的一行输出
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LogEvent(pub String);

pub fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
