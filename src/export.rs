//! Donation-history export in the tabular format served by
//! `/api/donations/export/{wallet}`. Fields containing the delimiter, a quote
//! or a newline are quoted with embedded quotes doubled; the writer applies
//! that escaping per record.

use crate::schema::Donation;

const HEADER: [&str; 7] = [
    "Date",
    "Transaction Hash",
    "Charity",
    "Campaign",
    "Amount (ETH)",
    "Block Number",
    "Message",
];

pub async fn donation_history_csv(donations: &[Donation]) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = csv_async::AsyncWriterBuilder::new().create_writer(&mut buf);
        writer.write_record(&HEADER).await?;
        for donation in donations {
            writer
                .write_record(&[
                    donation.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    donation.tx_hash.clone(),
                    donation.charity_name.clone().unwrap_or_default(),
                    donation
                        .campaign_title
                        .clone()
                        .unwrap_or_else(|| "Direct Donation".to_string()),
                    donation.amount.clone(),
                    donation
                        .block_number
                        .map(|b| b.to_string())
                        .unwrap_or_default(),
                    donation.message.clone().unwrap_or_default(),
                ])
                .await?;
        }
        writer.flush().await?;
    }
    Ok(buf)
}
