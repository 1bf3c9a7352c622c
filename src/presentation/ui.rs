use crate::application::{
    banner_images, display_price, App, HomeScreen, LoadState, NotificationKind, PendingRequest,
    Screen, Step, VerificationFlow,
};
use crate::domain::{RestaurantListing, OTP_LEN, PHONE_LEN};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

const NOTIFICATION_WIDTH: u16 = 42;

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen {
        Screen::Register => match app.flow.step {
            Step::EnteringPhone => render_phone_step(f, app, chunks[1]),
            Step::EnteringOtp => render_otp_step(f, &app.flow, chunks[1]),
        },
        Screen::Home => {
            if let Some(home) = &app.home {
                render_home(f, home, chunks[1]);
            }
        }
    }
    render_status_bar(f, app, chunks[2]);

    if let Some(home) = &app.home {
        if let (Some(index), Some(listing)) = (home.detail, home.detail_listing()) {
            render_detail_popup(f, listing, index);
        }
    }
    render_notifications(f, app);
    if app.help_visible {
        render_help_popup(f, app.screen);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Register => "fastor | Sign in".to_string(),
        Screen::Home => {
            let phone = app
                .session
                .as_ref()
                .map(|s| s.phone.masked())
                .unwrap_or_default();
            format!("fastor | Signed in as {}", phone)
        }
    };
    let header = Paragraph::new(title).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_phone_step(f: &mut Frame, app: &App, area: Rect) {
    let flow = &app.flow;
    let card = centered_rect(60, 12, area);

    let digits = flow.phone_input.value();
    let placeholder = "_".repeat(PHONE_LEN.saturating_sub(digits.len()));
    let button = if flow.pending == Some(PendingRequest::Register) {
        Span::styled("Sending...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("[ Send Code ]", button_style(flow.phone_input.is_complete()))
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "Enter Your Mobile Number",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "We will send you a 6 digit verification code",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {} ", app.dial_code), Style::default().fg(Color::Yellow)),
            Span::raw("│ "),
            Span::styled(digits.to_string(), Style::default().fg(Color::White)),
            Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
        Line::from(button),
    ];
    push_feedback(&mut lines, flow);

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Register"));
    f.render_widget(widget, card);
}

fn render_otp_step(f: &mut Frame, flow: &VerificationFlow, area: Rect) {
    let card = centered_rect(60, 14, area);

    let mut slots = Vec::with_capacity(OTP_LEN * 2);
    for (i, slot) in flow.otp.slots().iter().enumerate() {
        let style = if i == flow.otp.focus() {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        slots.push(Span::styled(format!("[ {} ]", slot.unwrap_or(' ')), style));
        slots.push(Span::raw(" "));
    }

    let button = if flow.pending == Some(PendingRequest::Verify) {
        Span::styled("Verifying...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("[ Verify ]", button_style(flow.otp.is_complete()))
    };
    let resend = if flow.pending == Some(PendingRequest::Resend) {
        Span::styled("Resending...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Resend (r)", Style::default().fg(Color::LightBlue))
    };
    let sent_to = flow
        .phone
        .as_ref()
        .map(|p| format!("Code sent to {}", p.masked()))
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(Span::styled(
            "OTP Verification",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Enter the verification code we just sent on your mobile number.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(sent_to, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(slots),
        Line::from(""),
        Line::from(button),
        Line::from(vec![Span::raw("Didn't receive code? "), resend]),
    ];
    push_feedback(&mut lines, flow);

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Verify"));
    f.render_widget(widget, card);
}

/// Buttons stay dim until their input is filled in.
fn button_style(ready: bool) -> Style {
    if ready {
        Style::default().fg(Color::Black).bg(Color::LightRed)
    } else {
        Style::default().fg(Color::Black).bg(Color::DarkGray)
    }
}

fn push_feedback(lines: &mut Vec<Line<'static>>, flow: &VerificationFlow) {
    lines.push(Line::from(""));
    if let Some(error) = &flow.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(info) = &flow.info {
        lines.push(Line::from(Span::styled(
            info.clone(),
            Style::default().fg(Color::Green),
        )));
    }
}

fn render_home(f: &mut Frame, home: &HomeScreen, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let location = Paragraph::new(vec![
        Line::from(Span::styled("Pre Order From", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            "Connaught Place",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ]);
    f.render_widget(location, chunks[0]);

    match &home.load {
        LoadState::Loading => {
            let loading = Paragraph::new("Loading restaurants...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(loading, chunks[1].union(chunks[3]));
        }
        LoadState::Failed(message) => {
            let failed = Paragraph::new(vec![
                Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red))),
                Line::from("Press r to retry"),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(failed, chunks[1].union(chunks[3]));
        }
        LoadState::Loaded => {
            render_carousel(f, home, chunks[1]);
            render_banner(f, home, chunks[2]);
            render_popular(f, home, chunks[3]);
        }
    }
}

fn render_carousel(f: &mut Frame, home: &HomeScreen, area: Rect) {
    let slides = home.slides();
    let index = home.carousel.index();
    let Some(slide) = slides.get(index) else {
        return;
    };

    let dots: Vec<Span> = (0..slides.len())
        .map(|i| {
            if i == index {
                Span::styled("● ", Style::default().fg(Color::LightRed))
            } else {
                Span::styled("○ ", Style::default().fg(Color::DarkGray))
            }
        })
        .collect();

    let lines = vec![
        Line::from(Span::styled(
            slide.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(slide.address.clone()),
        Line::from(Span::styled(
            slide.short_description.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            slide.image_url.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(dots),
    ];

    let title = if home.listings.is_empty() {
        "Suggested"
    } else {
        "Your taste"
    };
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

fn render_banner(f: &mut Frame, home: &HomeScreen, area: Rect) {
    let index = home.banner.index();
    let Some(image) = banner_images().get(index) else {
        return;
    };

    let widget = Paragraph::new(vec![
        Line::from(format!("Offer {}/{}", index + 1, home.banner.len())),
        Line::from(Span::styled(*image, Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().borders(Borders::ALL).title("Offers"));
    f.render_widget(widget, area);
}

fn render_popular(f: &mut Frame, home: &HomeScreen, area: Rect) {
    if home.listings.is_empty() {
        let empty = Paragraph::new("No restaurants nearby yet")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Popular Ones"));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Name").style(Style::default().fg(Color::Yellow)),
        Cell::from("Address").style(Style::default().fg(Color::Yellow)),
        Cell::from("Price").style(Style::default().fg(Color::Yellow)),
        Cell::from("Rating").style(Style::default().fg(Color::Yellow)),
    ]);

    let visible = area.height.saturating_sub(3) as usize;
    let offset = (home.selected + 1).saturating_sub(visible);

    let mut rows = vec![header];
    for (i, listing) in home.listings.iter().enumerate().skip(offset).take(visible) {
        let style = if i == home.selected {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };
        rows.push(
            Row::new(vec![
                Cell::from(listing.name.clone()),
                Cell::from(listing.address.clone()),
                Cell::from(display_price(i)),
                Cell::from("★ 4.5"),
            ])
            .style(style),
        );
    }

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(45),
        Constraint::Length(7),
        Constraint::Length(6),
    ];
    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title("Popular Ones"))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn render_detail_popup(f: &mut Frame, listing: &RestaurantListing, index: usize) {
    let popup_area = centered_rect(70, 12, f.area());
    f.render_widget(Clear, popup_area);

    let label = Style::default().fg(Color::Yellow);
    let lines = vec![
        Line::from(Span::styled(
            listing.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![Span::styled("Address: ", label), Span::raw(listing.address.clone())]),
        Line::from(vec![
            Span::styled("About: ", label),
            Span::raw(listing.short_description.clone()),
        ]),
        Line::from(vec![Span::styled("Price: ", label), Span::raw(display_price(index))]),
        Line::from(vec![Span::styled("Rating: ", label), Span::raw("★ 4.5")]),
        Line::from(vec![Span::styled("Image: ", label), Span::raw(listing.image_url.clone())]),
        Line::from(vec![
            Span::styled("Id: ", label),
            Span::raw(listing.restaurant_id.clone().unwrap_or_else(|| listing.id.clone())),
        ]),
    ];

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Restaurant (Esc to close)")
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(widget, popup_area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match app.screen {
        Screen::Register if app.flow.is_busy() => (
            "Waiting for the server...".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        Screen::Register => match app.flow.step {
            Step::EnteringPhone => (
                "Digits: type | Enter: send code | F1/?: help | Esc/q: quit".to_string(),
                Style::default(),
            ),
            Step::EnteringOtp => (
                "Digits: type | ←→: move | Enter: verify | r: resend | Esc: back | F1/?: help"
                    .to_string(),
                Style::default(),
            ),
        },
        Screen::Home => (
            "←→/drag: slides | ↑↓: select | Enter: details | r: refresh | L: logout | q: quit"
                .to_string(),
            Style::default().fg(Color::Green),
        ),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

fn render_notifications(f: &mut Frame, app: &App) {
    let area = f.area();
    let width = NOTIFICATION_WIDTH.min(area.width);
    let mut y = area.y + 1;

    for notification in app.notifications.iter() {
        if y + 3 > area.bottom() {
            break;
        }
        let rect = Rect {
            x: area.right().saturating_sub(width),
            y,
            width,
            height: 3,
        };
        let color = match notification.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
        };
        f.render_widget(Clear, rect);
        let toast = Paragraph::new(notification.text.clone())
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(color));
        f.render_widget(toast, rect);
        y += 3;
    }
}

fn render_help_popup(f: &mut Frame, screen: Screen) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_widget = Paragraph::new(help_text(screen))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help")
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));
    f.render_widget(help_widget, popup_area);
}

fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Register => {
            r#"SIGN IN

=== PHONE NUMBER ===
0-9             Type your 10 digit mobile number
Backspace       Delete the last digit
Paste           Replaces the number (separators are dropped)
Enter           Send the verification code
Esc/q           Quit

=== VERIFICATION CODE ===
0-9             Fill the focused box and move to the next
Backspace       Clear the box, or move back when it is empty
←/→             Move between boxes
Enter           Verify the code
r / Ctrl+R      Send a new code
Esc             Back to the phone number

Esc/F1/?/q      Close this help window"#
        }
        Screen::Home => {
            r#"RESTAURANTS

=== SLIDES ===
←/→ or h/l      Previous / next slide
Mouse drag      Swipe the slides
1-5             Jump to a slide
o               Open the current slide

=== POPULAR ONES ===
↑/↓ or k/j      Move the selection
Enter           Open or close the details
Esc             Close the details

=== OTHER ===
r               Refresh the list
L / Ctrl+L      Log out
q / Ctrl+C      Quit

Esc/F1/?/q      Close this help window"#
        }
    }
}

/// A rect `percent_x` wide and `height` tall, centred in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
