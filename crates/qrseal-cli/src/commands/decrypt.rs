use crate::app::AppContext;
use crate::cli::DecryptArgs;
use crate::helpers::read_text_input;

pub fn handle_decrypt(ctx: &AppContext, args: &DecryptArgs) -> anyhow::Result<()> {
    let payload = read_text_input(ctx.ui(), args.payload.clone(), "payload", ctx.no_input())?;
    let mut workflow = ctx.workflow()?;
    let plaintext = workflow.open_payload(&payload)?;
    println!("{}", plaintext);
    Ok(())
}
