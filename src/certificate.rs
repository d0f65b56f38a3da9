//! Renders the donation certificate served by
//! `/api/donations/certificate/{txHash}`. The document format is a
//! collaborator concern; this renderer produces a deterministic plain-text
//! certificate from already-recorded donation fields.

use crate::schema::Donation;

pub fn render(donation: &Donation) -> Vec<u8> {
    let donor = if donation.is_anonymous {
        "An anonymous donor"
    } else {
        donation.donor_address.as_str()
    };
    let charity = donation.charity_name.as_deref().unwrap_or("a charity");
    let campaign = donation
        .campaign_title
        .as_deref()
        .unwrap_or("Direct Donation");

    let mut doc = String::new();
    doc.push_str("==============================================\n");
    doc.push_str("          CERTIFICATE OF DONATION\n");
    doc.push_str("==============================================\n\n");
    doc.push_str(&format!("This certifies that {donor}\n"));
    doc.push_str(&format!(
        "donated {} ETH to {charity} ({campaign})\n",
        donation.amount
    ));
    doc.push_str(&format!(
        "on {}.\n\n",
        donation.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));
    doc.push_str(&format!("Transaction: {}\n", donation.tx_hash));
    if let Some(block) = donation.block_number {
        doc.push_str(&format!("Block: {block}\n"));
    }
    doc.push_str("\nThank you for your generosity.\n");
    doc.into_bytes()
}
