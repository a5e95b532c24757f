use axum::response::Html;

/// Server-rendered marketing pages. Static shells; the booking wizard
/// and admin dashboard talk to the JSON API underneath.
fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | Paris Private Transfers</title>\n</head>\n\
         <body>\n<main>\n<h1>{title}</h1>\n{body}\n</main>\n</body>\n</html>\n"
    ))
}

pub async fn home() -> Html<String> {
    page(
        "Private Chauffeur Transfers in Paris",
        "<p>Fixed-price private transfers between Paris, its airports, \
         train stations and Disneyland. Book online in three steps.</p>\n\
         <p><a href=\"/book\">Book a transfer</a></p>",
    )
}

pub async fn book() -> Html<String> {
    page(
        "Book Your Transfer",
        "<p>Choose your route, passengers and vehicle; the price is \
         calculated instantly as you fill in the form.</p>",
    )
}

pub async fn transfers() -> Html<String> {
    page(
        "Our Transfer Services",
        "<ul>\n<li><a href=\"/transfers/airports\">Airport transfers</a></li>\n\
         <li><a href=\"/transfers/train-stations\">Train station transfers</a></li>\n\
         <li><a href=\"/transfers/disneyland\">Disneyland transfers</a></li>\n</ul>",
    )
}

pub async fn airport_transfers() -> Html<String> {
    page(
        "Airport Transfers",
        "<p>Charles de Gaulle, Orly and Beauvais, with flight tracking \
         and meet-and-greet at arrivals.</p>",
    )
}

pub async fn train_station_transfers() -> Html<String> {
    page(
        "Train Station Transfers",
        "<p>All seven major Paris stations, from Gare du Nord to \
         Gare Montparnasse.</p>",
    )
}

pub async fn disneyland_transfers() -> Html<String> {
    page(
        "Disneyland Paris Transfers",
        "<p>Direct transfers to the parks or to your Disneyland \
         hotel.</p>",
    )
}

pub async fn faq() -> Html<String> {
    page(
        "Frequently Asked Questions",
        "<p>Cash bookings take a 20% deposit online; the rest is paid \
         to the driver. Card bookings are paid in full at checkout.</p>",
    )
}

pub async fn contact() -> Html<String> {
    page(
        "Contact Us",
        "<p>Questions about a booking or a quote for a custom trip? \
         Send us a message and we will get back to you.</p>",
    )
}

pub async fn success() -> Html<String> {
    page(
        "Booking Confirmed",
        "<p>Thank you! Your booking details and payment summary are \
         shown below.</p>",
    )
}
