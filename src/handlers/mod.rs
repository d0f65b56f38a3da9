mod campaigns;
mod charity_requests;
mod donations;
mod statistics;
mod transactions;
mod withdrawals;

pub use campaigns::*;
pub use charity_requests::*;
pub use donations::*;
pub use statistics::*;
pub use transactions::*;
pub use withdrawals::*;

use actix_web::{HttpResponse, Responder, get};

#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().body("Welcome to Charity Ledger Service!")
}
